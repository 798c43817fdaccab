//! Repository layer over client-local key-value slots.
//!
//! # Responsibility
//! - Define slot storage contracts and the SQLite implementation.
//! - Encode/decode cart and session snapshots with tolerant reads.
//!
//! # Invariants
//! - Snapshot adapters never propagate storage or decode failures; they log
//!   and fall back (empty cart, logged-out session).
//! - Every write replaces the whole slot payload.

pub mod cart_repo;
pub mod session_repo;
pub mod slot_store;
