//! Core storefront logic for NutriCurator.
//! This crate is the single source of truth for cart, pricing and session
//! invariants; UI shells call into it through the FFI crate.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::{demo_catalog, Catalog};
pub use config::{AnalysisConfig, PricingPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{HealthProfile, SessionSnapshot, User};
pub use model::analysis::{Alternative, AnalysisResult};
pub use model::cart::{AiDecision, CartEntry, CartEntryId};
pub use model::product::{Category, CategoryId, Money, Nutrition, Product, ProductId};
pub use repo::cart_repo::{CartStore, SlotCartStore};
pub use repo::session_repo::SessionStore;
pub use repo::slot_store::{SlotStore, SqliteSlotStore, StoreError, StoreResult};
pub use service::analysis_service::{
    AnalysisError, AnalysisStatus, AnalysisTask, Analyzer, MockAnalyzer,
};
pub use service::auth_service::{AuthError, AuthService, SignupForm, SignupHealthData};
pub use service::cart_service::CartEngine;
pub use service::pricing::CheckoutSummary;
pub use service::storefront_service::{Storefront, StorefrontError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
