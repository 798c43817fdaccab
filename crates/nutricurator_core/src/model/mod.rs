//! Storefront domain model.
//!
//! # Responsibility
//! - Define canonical records shared by catalog, cart, session and analysis
//!   code.
//! - Own the serde wire shapes of the persisted key-value slots.
//!
//! # Invariants
//! - Catalog records are immutable reference data.
//! - Cart entries carry their product by value, so a snapshot is
//!   self-contained.

pub mod account;
pub mod analysis;
pub mod cart;
pub mod product;
