//! Cart line-item model.
//!
//! # Responsibility
//! - Define the persisted shape of one cart entry.
//! - Validate entries and whole snapshots before they reach the engine.
//!
//! # Invariants
//! - `entry_id` is unique within one cart snapshot.
//! - `quantity` is always >= 1.
//! - At most one entry per distinct `product.product_id`.
//! - Entry ids stay at or below [`MAX_ENTRY_ID`] and unit prices within
//!   `0..=MAX_UNIT_PRICE`, so id allocation and checkout sums cannot
//!   overflow.
//!
//! # See also
//! - crate::service::cart_service

use crate::model::product::{Money, Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cart-local identifier, assigned monotonically by the engine.
pub type CartEntryId = u64;

/// Largest entry id a snapshot may carry.
pub const MAX_ENTRY_ID: CartEntryId = u32::MAX as CartEntryId;
/// Largest selling or list price a snapshot may carry.
pub const MAX_UNIT_PRICE: Money = 1_000_000_000;

/// Verdict attached to an entry by the health analysis flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiDecision {
    Safe,
    Caution,
    Warning,
}

impl AiDecision {
    /// Stable wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Warning => "warning",
        }
    }

    /// Parses a wire label; unknown values map to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "safe" => Some(Self::Safe),
            "caution" => Some(Self::Caution),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

/// One line item in the cart, tied to a distinct product.
///
/// Serialized with the storefront's snapshot field names
/// (`cart_item_id`, `checked`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "cart_item_id")]
    pub entry_id: CartEntryId,
    pub product: Product,
    pub quantity: u32,
    /// Whether the entry takes part in checkout totals.
    #[serde(rename = "checked")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_decision: Option<AiDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
}

impl CartEntry {
    /// Creates a selected entry with quantity 1.
    pub fn new(entry_id: CartEntryId, product: Product) -> Self {
        Self {
            entry_id,
            product,
            quantity: 1,
            selected: true,
            ai_decision: None,
            ai_reason: None,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.product_id
    }

    /// Selling price times quantity.
    pub fn line_price(&self) -> Money {
        self.product.price.saturating_mul(Money::from(self.quantity))
    }

    /// Checks single-entry invariants.
    pub fn validate(&self) -> Result<(), CartValidationError> {
        if self.quantity < 1 {
            return Err(CartValidationError::ZeroQuantity(self.entry_id));
        }
        if self.entry_id > MAX_ENTRY_ID {
            return Err(CartValidationError::EntryIdOutOfRange(self.entry_id));
        }
        let price_range = 0..=MAX_UNIT_PRICE;
        if !price_range.contains(&self.product.price)
            || !price_range.contains(&self.product.original_price)
        {
            return Err(CartValidationError::PriceOutOfRange(self.entry_id));
        }
        Ok(())
    }
}

/// Invariant violations detected in a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartValidationError {
    ZeroQuantity(CartEntryId),
    EntryIdOutOfRange(CartEntryId),
    PriceOutOfRange(CartEntryId),
    DuplicateEntryId(CartEntryId),
    DuplicateProduct(ProductId),
}

impl Display for CartValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroQuantity(id) => write!(f, "cart entry {id} has quantity below 1"),
            Self::EntryIdOutOfRange(id) => {
                write!(f, "cart entry id {id} exceeds {MAX_ENTRY_ID}")
            }
            Self::PriceOutOfRange(id) => {
                write!(f, "cart entry {id} has a price outside 0..={MAX_UNIT_PRICE}")
            }
            Self::DuplicateEntryId(id) => write!(f, "cart entry id {id} appears more than once"),
            Self::DuplicateProduct(id) => {
                write!(f, "product {id} appears in more than one cart entry")
            }
        }
    }
}

impl Error for CartValidationError {}

/// Validates a whole snapshot: every entry plus cross-entry uniqueness.
pub fn validate_entries(entries: &[CartEntry]) -> Result<(), CartValidationError> {
    let mut entry_ids = HashSet::with_capacity(entries.len());
    let mut product_ids = HashSet::with_capacity(entries.len());

    for entry in entries {
        entry.validate()?;
        if !entry_ids.insert(entry.entry_id) {
            return Err(CartValidationError::DuplicateEntryId(entry.entry_id));
        }
        if !product_ids.insert(entry.product_id()) {
            return Err(CartValidationError::DuplicateProduct(entry.product_id()));
        }
    }

    Ok(())
}
