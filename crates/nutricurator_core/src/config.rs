//! Static configuration for storefront core behavior.
//!
//! # Responsibility
//! - Hold slot keys, pricing defaults and analysis timing in one place.
//! - Provide `Default` values that match the storefront's behavior.
//!
//! # Invariants
//! - Slot keys are stable; renaming one orphans previously persisted data.

use crate::model::product::Money;
use std::time::Duration;

/// Key-value slot holding the cart snapshot.
pub const CART_SLOT_KEY: &str = "nutricurator_cart";
/// Key-value slot holding the session snapshot.
pub const AUTH_SLOT_KEY: &str = "nutricurator_auth";

/// Subtotal at or above which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: Money = 20_000;
/// Flat delivery fee charged below the threshold.
pub const DELIVERY_FEE: Money = 3_000;

/// Simulated analysis latency.
pub const ANALYSIS_DELAY: Duration = Duration::from_millis(2_000);

/// Minimum accepted signup password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Number of products shown in recommendation and related rows.
pub const SHOWCASE_LIMIT: usize = 4;

/// Delivery pricing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub free_threshold: Money,
    pub delivery_fee: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: FREE_DELIVERY_THRESHOLD,
            delivery_fee: DELIVERY_FEE,
        }
    }
}

/// Simulated analysis timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub delay: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay: ANALYSIS_DELAY,
        }
    }
}
