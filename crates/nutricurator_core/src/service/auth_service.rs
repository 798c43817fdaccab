//! Simulated shopper session: login, signup and logout.
//!
//! # Responsibility
//! - Validate login/signup form input and report the first failing guard.
//! - Install the mock account on success and persist it to the session slot.
//!
//! # Invariants
//! - No credential is checked; any non-empty email/password logs in.
//! - A session is either fully present (user + profile) or absent.
//! - Validation failures never touch the persisted slot.

use crate::config::MIN_PASSWORD_CHARS;
use crate::model::account::{HealthProfile, SessionSnapshot, User, UserId, NOT_APPLICABLE};
use crate::repo::session_repo::SessionStore;
use crate::repo::slot_store::SlotStore;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const DEMO_USER_ID: UserId = 101;
const SIGNUP_USER_ID: UserId = 102;
// 2026-02-20T10:15:30+09:00
const DEMO_CREATED_AT_MS: i64 = 1_771_550_130_000;
// 2026-02-20T10:14:55+09:00
const DEMO_AGREED_AT_MS: i64 = 1_771_550_095_000;

/// Form validation failures, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    EmailRequired,
    InvalidEmail,
    PasswordRequired,
    PasswordTooShort { min_chars: usize },
    PasswordMismatch,
    TermsNotAgreed,
    SensitiveConsentRequired,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailRequired => write!(f, "Please enter your email."),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
            Self::PasswordRequired => write!(f, "Please enter your password."),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "Password must be at least {min_chars} characters.")
            }
            Self::PasswordMismatch => write!(f, "Passwords do not match."),
            Self::TermsNotAgreed => write!(f, "Please agree to the required terms."),
            Self::SensitiveConsentRequired => write!(
                f,
                "Health information was provided; please consent to sensitive data collection."
            ),
        }
    }
}

impl Error for AuthError {}

/// Optional health conditions collected at signup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupHealthData {
    pub diabetes: Option<String>,
    pub hypertension: Option<String>,
    pub kidneydisease: Option<String>,
    pub allergy: Vec<String>,
}

impl SignupHealthData {
    /// True when any condition or allergy was filled in.
    pub fn is_provided(&self) -> bool {
        [&self.diabetes, &self.hypertension, &self.kidneydisease]
            .into_iter()
            .any(|value| value.as_deref().is_some_and(|text| !text.trim().is_empty()))
            || !self.allergy.is_empty()
    }
}

/// Signup form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub tos_agreed: bool,
    pub privacy_agreed: bool,
    pub sensitive_agreed: bool,
    pub health: SignupHealthData,
}

impl SignupForm {
    /// Runs every guard in order and returns the first failure.
    pub fn validate(&self) -> Result<(), AuthError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AuthError::EmailRequired);
        }
        if !EMAIL_RE.is_match(email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(AuthError::PasswordRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort {
                min_chars: MIN_PASSWORD_CHARS,
            });
        }
        if self.password != self.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if !self.tos_agreed || !self.privacy_agreed {
            return Err(AuthError::TermsNotAgreed);
        }
        if self.health.is_provided() && !self.sensitive_agreed {
            return Err(AuthError::SensitiveConsentRequired);
        }
        Ok(())
    }
}

/// Session owner for one storefront instance.
pub struct AuthService<S: SlotStore> {
    store: SessionStore<S>,
    session: Option<SessionSnapshot>,
}

impl<S: SlotStore> AuthService<S> {
    /// Restores any persisted session from the slot store.
    pub fn restore(slots: S) -> Self {
        let store = SessionStore::new(slots);
        let session = store.load();
        Self { store, session }
    }

    pub fn session(&self) -> Option<&SessionSnapshot> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn health_profile(&self) -> Option<&HealthProfile> {
        self.session.as_ref().map(|session| &session.health_profile)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Logs in as the demo shopper under the given email.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&SessionSnapshot, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::EmailRequired);
        }
        if password.is_empty() {
            return Err(AuthError::PasswordRequired);
        }

        let snapshot = SessionSnapshot {
            user: User {
                email: email.to_string(),
                ..demo_user()
            },
            health_profile: demo_health_profile(),
        };
        info!(
            "event=auth_login module=service status=ok user_id={}",
            snapshot.user.user_id
        );
        Ok(self.install(snapshot))
    }

    /// Registers a new shopper using the current wall clock.
    pub fn signup(&mut self, form: &SignupForm) -> Result<&SessionSnapshot, AuthError> {
        self.signup_at(form, now_epoch_ms())
    }

    /// Registers a new shopper with an explicit creation time.
    pub fn signup_at(
        &mut self,
        form: &SignupForm,
        now_ms: i64,
    ) -> Result<&SessionSnapshot, AuthError> {
        form.validate()?;

        let health = &form.health;
        let condition = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(NOT_APPLICABLE)
                .to_string()
        };

        let user = User {
            user_id: SIGNUP_USER_ID,
            email: form.email.trim().to_string(),
            created_at: now_ms,
            updated_at: now_ms,
            is_sensitive_agreed: health.is_provided(),
            agreed_at: now_ms,
            is_tos_agreed: true,
            is_privacy_agreed: true,
        };
        let health_profile = HealthProfile {
            diabetes: condition(&health.diabetes),
            hypertension: condition(&health.hypertension),
            kidneydisease: condition(&health.kidneydisease),
            allergy: health.allergy.join(", "),
            ..HealthProfile::blank(SIGNUP_USER_ID)
        };

        info!(
            "event=auth_signup module=service status=ok user_id={} health_provided={}",
            user.user_id,
            health.is_provided()
        );
        Ok(self.install(SessionSnapshot {
            user,
            health_profile,
        }))
    }

    /// Drops the session and clears the slot.
    pub fn logout(&mut self) {
        self.session = None;
        self.store.clear();
        info!("event=auth_logout module=service status=ok");
    }

    fn install(&mut self, snapshot: SessionSnapshot) -> &SessionSnapshot {
        self.store.save(&snapshot);
        self.session.insert(snapshot)
    }
}

fn demo_user() -> User {
    User {
        user_id: DEMO_USER_ID,
        email: "user101@example.com".to_string(),
        created_at: DEMO_CREATED_AT_MS,
        updated_at: DEMO_CREATED_AT_MS,
        is_sensitive_agreed: true,
        agreed_at: DEMO_AGREED_AT_MS,
        is_tos_agreed: true,
        is_privacy_agreed: true,
    }
}

fn demo_health_profile() -> HealthProfile {
    HealthProfile {
        gender: "F".to_string(),
        birth_date: "1995-07-12".to_string(),
        height: 165.3,
        weight: 58.75,
        average_of_steps: 8_421,
        activity_level: "3-4 times a week".to_string(),
        hypertension: "prehypertension".to_string(),
        allergy: "Peanut".to_string(),
        notes: "Light exercise recommended, prefers low-sodium meals".to_string(),
        favorite: "Spicy food".to_string(),
        goal: "Diet".to_string(),
        ..HealthProfile::blank(DEMO_USER_ID)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
