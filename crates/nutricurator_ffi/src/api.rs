//! FFI use-case API for the storefront UI shell.
//!
//! # Responsibility
//! - Expose catalog, session, cart and analysis use-cases to Dart via FRB.
//! - Flatten core types into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the storefront database, hydrates state, applies one
//!   use-case and returns; no state is cached between calls except the
//!   resolved database path.

use log::warn;
use nutricurator_core::config::SHOWCASE_LIMIT;
use nutricurator_core::db::open_db;
use nutricurator_core::{
    core_version as core_version_inner, demo_catalog, init_logging as init_logging_inner,
    ping as ping_inner, AnalysisConfig, AnalysisResult, AnalysisStatus, AnalysisTask,
    CartEngine, CartEntry, CartStore, MockAnalyzer, Product, SignupForm, SignupHealthData,
    SlotCartStore, SqliteSlotStore, Storefront,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const STOREFRONT_DB_FILE_NAME: &str = "nutricurator_storefront.sqlite3";
static STOREFRONT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type EntryStorefront<'a, 'conn> =
    Storefront<SlotCartStore<&'a SqliteSlotStore<'conn>>, &'a SqliteSlotStore<'conn>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Product card data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductItem {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub category_id: i64,
    pub image_url: String,
    pub price: i64,
    pub original_price: i64,
    pub discount_rate: f64,
}

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub entry_id: u64,
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub original_price: i64,
    pub quantity: u32,
    pub selected: bool,
    /// `safe|caution|warning` when a verdict is attached.
    pub ai_decision: Option<String>,
    pub ai_reason: Option<String>,
}

/// Cart page envelope: rows plus checkout summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartResponse {
    pub ok: bool,
    pub message: String,
    pub lines: Vec<CartLine>,
    pub total_item_count: u64,
    pub all_selected: bool,
    pub product_total: i64,
    pub discount_total: i64,
    pub delivery_fee: i64,
    pub final_total: i64,
    pub remaining_for_free_delivery: i64,
}

impl CartResponse {
    fn from_engine<S: CartStore>(engine: &CartEngine<S>, message: impl Into<String>) -> Self {
        let summary = engine.summary();
        Self {
            ok: true,
            message: message.into(),
            lines: engine.entries().iter().map(to_cart_line).collect(),
            total_item_count: engine.total_item_count(),
            all_selected: engine.all_selected(),
            product_total: summary.product_total,
            discount_total: summary.discount_total,
            delivery_fee: summary.delivery_fee,
            final_total: summary.final_total,
            remaining_for_free_delivery: summary.remaining_for_free_delivery,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Session envelope for login/logout flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    pub logged_in: bool,
    pub email: Option<String>,
    pub message: String,
}

/// Signup form fields as entered on the signup page.
///
/// Blank condition strings count as not provided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub tos_agreed: bool,
    pub privacy_agreed: bool,
    pub sensitive_agreed: bool,
    pub diabetes: Option<String>,
    pub hypertension: Option<String>,
    pub kidneydisease: Option<String>,
    pub allergy: Vec<String>,
}

impl From<SignupRequest> for SignupForm {
    fn from(request: SignupRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            password_confirm: request.password_confirm,
            tos_agreed: request.tos_agreed,
            privacy_agreed: request.privacy_agreed,
            sensitive_agreed: request.sensitive_agreed,
            health: SignupHealthData {
                diabetes: request.diabetes,
                hypertension: request.hypertension,
                kidneydisease: request.kidneydisease,
                allergy: request.allergy,
            },
        }
    }
}

/// Analysis envelope for the product detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub ok: bool,
    pub decision: Option<String>,
    pub reason_summary: String,
    pub alternative_ids: Vec<i64>,
    pub alternative_names: Vec<String>,
    pub message: String,
}

/// Lists products, optionally restricted to one category.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_products(category_id: Option<i64>) -> Vec<ProductItem> {
    demo_catalog()
        .products_in_category(category_id)
        .into_iter()
        .map(to_product_item)
        .collect()
}

/// Top discounted products for the home page.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_recommended(limit: u32) -> Vec<ProductItem> {
    demo_catalog()
        .recommended(limit as usize)
        .into_iter()
        .map(to_product_item)
        .collect()
}

/// Same-category suggestions shown under a product detail page.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_related(product_id: i64) -> Vec<ProductItem> {
    demo_catalog()
        .related(product_id, SHOWCASE_LIMIT)
        .into_iter()
        .map(to_product_item)
        .collect()
}

/// Logs in with the demo account.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> AuthResponse {
    let outcome = with_storefront(|storefront| {
        storefront
            .auth_mut()
            .login(&email, &password)
            .map(|session| session.user.email.clone())
            .map_err(|err| err.to_string())
    });

    session_response(outcome.and_then(|inner| inner), "Logged in.")
}

/// Registers a new shopper and logs them in.
///
/// # FFI contract
/// - On a failed guard, `message` carries the first validation error.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_signup(request: SignupRequest) -> AuthResponse {
    let form = SignupForm::from(request);
    let outcome = with_storefront(|storefront| {
        storefront
            .auth_mut()
            .signup(&form)
            .map(|session| session.user.email.clone())
            .map_err(|err| err.to_string())
    });

    session_response(outcome.and_then(|inner| inner), "Signed up.")
}

/// Reports whether a persisted session exists.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_status() -> AuthResponse {
    let outcome = with_storefront(|storefront| {
        storefront
            .auth()
            .user()
            .map(|user| user.email.clone())
    });

    match outcome {
        Ok(Some(email)) => AuthResponse {
            ok: true,
            logged_in: true,
            email: Some(email),
            message: "Logged in.".to_string(),
        },
        Ok(None) => AuthResponse {
            ok: true,
            logged_in: false,
            email: None,
            message: "Logged out.".to_string(),
        },
        Err(message) => AuthResponse {
            ok: false,
            logged_in: false,
            email: None,
            message,
        },
    }
}

/// Ends the session.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> AuthResponse {
    match with_storefront(|storefront| storefront.auth_mut().logout()) {
        Ok(()) => AuthResponse {
            ok: true,
            logged_in: false,
            email: None,
            message: "Logged out.".to_string(),
        },
        Err(message) => AuthResponse {
            ok: false,
            logged_in: false,
            email: None,
            message,
        },
    }
}

/// Current cart and checkout summary.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_view() -> CartResponse {
    cart_action("Cart loaded.", |_| Ok(()))
}

/// Adds one unit of a product from its detail page (login required).
#[flutter_rust_bridge::frb(sync)]
pub fn cart_add(product_id: i64) -> CartResponse {
    cart_action("Added to cart.", |storefront| {
        storefront
            .add_to_cart(product_id)
            .map(|_| ())
            .map_err(|err| format!("cart_add failed: {err}"))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn cart_remove(entry_id: u64) -> CartResponse {
    cart_action("Entry removed.", |storefront| {
        storefront.cart_mut().remove(entry_id);
        Ok(())
    })
}

/// Values below 1 are ignored and the cart is returned unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_set_quantity(entry_id: u64, quantity: i64) -> CartResponse {
    cart_action("Quantity updated.", |storefront| {
        storefront.cart_mut().set_quantity(entry_id, quantity);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn cart_toggle_selected(entry_id: u64) -> CartResponse {
    cart_action("Selection updated.", |storefront| {
        storefront.cart_mut().toggle_selected(entry_id);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn cart_set_all_selected(selected: bool) -> CartResponse {
    cart_action("Selection updated.", |storefront| {
        storefront.cart_mut().set_all_selected(selected);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn cart_remove_selected() -> CartResponse {
    cart_action("Selected entries removed.", |storefront| {
        storefront.cart_mut().remove_selected();
        Ok(())
    })
}

/// Runs the health analysis for one product (login required).
///
/// # FFI contract
/// - Returns the finished verdict immediately; the UI owns the loading
///   animation that stands in for analysis latency.
#[flutter_rust_bridge::frb(sync)]
pub fn product_analyze(product_id: i64) -> AnalysisResponse {
    let outcome = with_storefront(|storefront| -> Result<AnalysisResult, String> {
        let mut task = AnalysisTask::with_config(
            MockAnalyzer,
            AnalysisConfig {
                delay: Duration::ZERO,
            },
        );
        let now = Instant::now();
        storefront
            .start_analysis(&mut task, product_id, now)
            .map_err(|err| format!("product_analyze failed: {err}"))?;
        match task.poll(now) {
            AnalysisStatus::Complete => task
                .result()
                .cloned()
                .ok_or_else(|| "product_analyze failed: missing result".to_string()),
            status => Err(format!("product_analyze failed: task is {status:?}")),
        }
    });

    match outcome.and_then(|inner| inner) {
        Ok(result) => AnalysisResponse {
            ok: true,
            decision: Some(result.decision.as_str().to_string()),
            reason_summary: result.reason_summary,
            alternative_ids: result.alternatives.iter().map(|alt| alt.id).collect(),
            alternative_names: result.alternatives.into_iter().map(|alt| alt.name).collect(),
            message: "Analysis complete.".to_string(),
        },
        Err(message) => AnalysisResponse {
            ok: false,
            decision: None,
            reason_summary: String::new(),
            alternative_ids: Vec::new(),
            alternative_names: Vec::new(),
            message,
        },
    }
}

fn cart_action(
    success_message: &str,
    action: impl FnOnce(&mut EntryStorefront<'_, '_>) -> Result<(), String>,
) -> CartResponse {
    let outcome = with_storefront(|storefront| -> Result<CartResponse, String> {
        action(storefront)?;
        Ok(CartResponse::from_engine(storefront.cart(), success_message))
    });

    match outcome.and_then(|inner| inner) {
        Ok(response) => response,
        Err(message) => CartResponse::failure(message),
    }
}

fn session_response(outcome: Result<String, String>, success_message: &str) -> AuthResponse {
    match outcome {
        Ok(email) => AuthResponse {
            ok: true,
            logged_in: true,
            email: Some(email),
            message: success_message.to_string(),
        },
        Err(message) => AuthResponse {
            ok: false,
            logged_in: false,
            email: None,
            message,
        },
    }
}

fn resolve_storefront_db_path() -> PathBuf {
    STOREFRONT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("NUTRICURATOR_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STOREFRONT_DB_FILE_NAME)
        })
        .clone()
}

fn with_storefront<T>(f: impl FnOnce(&mut EntryStorefront<'_, '_>) -> T) -> Result<T, String> {
    let db_path = resolve_storefront_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=storefront_open module=ffi status=error error={err}");
        format!("storefront DB open failed: {err}")
    })?;
    let slots = SqliteSlotStore::new(&conn);
    let mut storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
    Ok(f(&mut storefront))
}

fn to_product_item(product: &Product) -> ProductItem {
    ProductItem {
        product_id: product.product_id,
        name: product.name.clone(),
        brand: product.brand.clone(),
        category_id: product.category_id,
        image_url: product.image_url.clone(),
        price: product.price,
        original_price: product.original_price,
        discount_rate: product.discount_rate,
    }
}

fn to_cart_line(entry: &CartEntry) -> CartLine {
    CartLine {
        entry_id: entry.entry_id,
        product_id: entry.product_id(),
        name: entry.product.name.clone(),
        brand: entry.product.brand.clone(),
        price: entry.product.price,
        original_price: entry.product.original_price,
        quantity: entry.quantity,
        selected: entry.selected,
        ai_decision: entry.ai_decision.map(|decision| decision.as_str().to_string()),
        ai_reason: entry.ai_reason.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        auth_login, auth_logout, auth_signup, auth_status, cart_add, cart_set_quantity,
        cart_toggle_selected, cart_view, catalog_products, catalog_recommended, catalog_related,
        core_version, init_logging, ping, product_analyze, SignupRequest,
    };
    use std::sync::{Mutex, MutexGuard};

    // Tests share one storefront database file; mutating calls must not interleave.
    static STOREFRONT_DB_LOCK: Mutex<()> = Mutex::new(());

    fn lock_storefront_db() -> MutexGuard<'static, ()> {
        STOREFRONT_DB_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn catalog_views_filter_and_rank() {
        let grains = catalog_products(Some(2));
        assert!(!grains.is_empty());
        assert!(grains.iter().all(|item| item.category_id == 2));
        assert!(catalog_products(Some(999)).is_empty());

        let recommended = catalog_recommended(4);
        assert_eq!(recommended.len(), 4);
        assert!(recommended
            .windows(2)
            .all(|pair| pair[0].discount_rate >= pair[1].discount_rate));

        let related = catalog_related(10041);
        assert!(related.len() <= 4);
        assert!(related.iter().all(|item| item.product_id != 10041));
    }

    #[test]
    fn login_then_add_returns_tagged_line_and_summary() {
        let _guard = lock_storefront_db();
        let login = auth_login("shopper@example.com".to_string(), "secret".to_string());
        assert!(login.ok, "{}", login.message);

        let response = cart_add(10049);
        assert!(response.ok, "{}", response.message);
        let line = response
            .lines
            .iter()
            .find(|line| line.product_id == 10049)
            .expect("added product should be in cart");
        assert!(line.quantity >= 1);
        assert_eq!(line.ai_decision.as_deref(), Some("caution"));
        assert!(response.total_item_count >= u64::from(line.quantity));
    }

    #[test]
    fn quantity_below_one_keeps_line_unchanged() {
        let _guard = lock_storefront_db();
        auth_login("shopper@example.com".to_string(), "secret".to_string());
        let added = cart_add(10051);
        assert!(added.ok, "{}", added.message);
        let entry_id = added
            .lines
            .iter()
            .find(|line| line.product_id == 10051)
            .map(|line| line.entry_id)
            .expect("added product should be in cart");

        let updated = cart_set_quantity(entry_id, 3);
        let quantity_of = |lines: &[super::CartLine]| {
            lines
                .iter()
                .find(|line| line.entry_id == entry_id)
                .map(|line| line.quantity)
        };
        assert_eq!(quantity_of(&updated.lines), Some(3));

        let rejected = cart_set_quantity(entry_id, 0);
        assert!(rejected.ok);
        assert_eq!(quantity_of(&rejected.lines), Some(3));
    }

    #[test]
    fn unknown_entry_toggle_is_a_noop() {
        let _guard = lock_storefront_db();
        let before = cart_view();
        assert!(before.ok, "{}", before.message);
        let after = cart_toggle_selected(u64::MAX);
        assert!(after.ok);
        assert!(after.lines.iter().all(|line| line.entry_id != u64::MAX));
    }

    #[test]
    fn analysis_for_unknown_product_fails_cleanly() {
        let _guard = lock_storefront_db();
        auth_login("shopper@example.com".to_string(), "secret".to_string());
        let response = product_analyze(404);
        assert!(!response.ok);
        assert!(response.message.contains("404"));

        let response = product_analyze(10041);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.decision.as_deref(), Some("caution"));
        assert_eq!(response.alternative_ids, vec![10046, 10049, 10048]);
    }

    #[test]
    fn signup_reports_first_failed_guard_then_logs_in() {
        let _guard = lock_storefront_db();
        auth_logout();

        let rejected = auth_signup(SignupRequest {
            email: "new@example.com".to_string(),
            password: "short".to_string(),
            password_confirm: "short".to_string(),
            tos_agreed: true,
            privacy_agreed: true,
            ..SignupRequest::default()
        });
        assert!(!rejected.ok);
        assert!(rejected.message.contains("at least 8"));
        assert!(!auth_status().logged_in);

        let accepted = auth_signup(SignupRequest {
            email: "new@example.com".to_string(),
            password: "long-enough".to_string(),
            password_confirm: "long-enough".to_string(),
            tos_agreed: true,
            privacy_agreed: true,
            sensitive_agreed: true,
            hypertension: Some("prehypertension".to_string()),
            allergy: vec!["peanut".to_string()],
            ..SignupRequest::default()
        });
        assert!(accepted.ok, "{}", accepted.message);
        assert_eq!(accepted.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn status_follows_login_and_logout() {
        let _guard = lock_storefront_db();
        auth_login("shopper@example.com".to_string(), "secret".to_string());
        let status = auth_status();
        assert!(status.ok);
        assert!(status.logged_in);
        assert_eq!(status.email.as_deref(), Some("shopper@example.com"));

        auth_logout();
        let status = auth_status();
        assert!(status.ok);
        assert!(!status.logged_in);
        assert_eq!(status.email, None);
    }
}
