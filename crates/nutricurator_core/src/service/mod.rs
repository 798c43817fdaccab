//! Core use-case services.
//!
//! # Responsibility
//! - Own storefront state (cart, session, analysis) and its mutations.
//! - Keep UI/FFI layers decoupled from slot storage details.

pub mod analysis_service;
pub mod auth_service;
pub mod cart_service;
pub mod pricing;
pub mod storefront_service;
