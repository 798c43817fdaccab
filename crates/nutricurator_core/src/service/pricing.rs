//! Checkout pricing and delivery policy.
//!
//! # Responsibility
//! - Compute list total, discount, subtotal, delivery fee and final total
//!   from the entries a shopper selected.
//!
//! # Invariants
//! - All functions are pure; callers pass the selected entries.
//! - Discounts are not clamped: a selling price above list price yields a
//!   negative discount.
//! - An empty selection costs nothing, delivery included.
//! - Arithmetic saturates at the `Money` bounds instead of overflowing.

use crate::config::PricingPolicy;
use crate::model::cart::CartEntry;
use crate::model::product::Money;

/// Derived checkout totals for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckoutSummary {
    pub product_total: Money,
    pub discount_total: Money,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub final_total: Money,
    pub remaining_for_free_delivery: Money,
}

/// Sum of list price times quantity.
pub fn product_total<'a>(entries: impl IntoIterator<Item = &'a CartEntry>) -> Money {
    entries
        .into_iter()
        .map(|entry| {
            entry
                .product
                .original_price
                .saturating_mul(Money::from(entry.quantity))
        })
        .fold(0, Money::saturating_add)
}

/// Sum of per-unit discount times quantity.
pub fn discount_total<'a>(entries: impl IntoIterator<Item = &'a CartEntry>) -> Money {
    entries
        .into_iter()
        .map(|entry| {
            entry
                .product
                .unit_discount()
                .saturating_mul(Money::from(entry.quantity))
        })
        .fold(0, Money::saturating_add)
}

impl PricingPolicy {
    /// Zero at or above the threshold, and zero for an empty subtotal.
    pub fn delivery_fee(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_threshold || subtotal == 0 {
            0
        } else {
            self.delivery_fee
        }
    }

    pub fn remaining_for_free_delivery(&self, subtotal: Money) -> Money {
        self.free_threshold.saturating_sub(subtotal).max(0)
    }

    /// Computes every checkout figure for the given selection.
    pub fn summarize<'a>(
        &self,
        selected: impl IntoIterator<Item = &'a CartEntry>,
    ) -> CheckoutSummary {
        let selected = selected.into_iter().collect::<Vec<_>>();
        let product_total = product_total(selected.iter().copied());
        let discount_total = discount_total(selected.iter().copied());
        let subtotal = product_total.saturating_sub(discount_total);
        let delivery_fee = self.delivery_fee(subtotal);

        CheckoutSummary {
            product_total,
            discount_total,
            subtotal,
            delivery_fee,
            final_total: subtotal.saturating_add(delivery_fee),
            remaining_for_free_delivery: self.remaining_for_free_delivery(subtotal),
        }
    }
}

/// Summarizes with the default threshold and fee.
pub fn summarize<'a>(selected: impl IntoIterator<Item = &'a CartEntry>) -> CheckoutSummary {
    PricingPolicy::default().summarize(selected)
}

#[cfg(test)]
mod tests {
    use super::{discount_total, product_total, summarize, CheckoutSummary};
    use crate::config::PricingPolicy;
    use crate::model::cart::CartEntry;
    use crate::model::product::Product;

    fn entry(id: u64, price: i64, original_price: i64, quantity: u32) -> CartEntry {
        let product = Product::new(id as i64, "p", "b", 1, price, original_price);
        let mut entry = CartEntry::new(id, product);
        entry.quantity = quantity;
        entry
    }

    #[test]
    fn empty_selection_is_free() {
        assert_eq!(
            summarize(Vec::<&CartEntry>::new()),
            CheckoutSummary {
                remaining_for_free_delivery: 20_000,
                ..CheckoutSummary::default()
            }
        );
    }

    #[test]
    fn below_threshold_pays_delivery() {
        let entries = [entry(1, 8_000, 10_000, 2)];
        let summary = summarize(&entries);
        assert_eq!(summary.product_total, 20_000);
        assert_eq!(summary.discount_total, 4_000);
        assert_eq!(summary.subtotal, 16_000);
        assert_eq!(summary.delivery_fee, 3_000);
        assert_eq!(summary.final_total, 19_000);
        assert_eq!(summary.remaining_for_free_delivery, 4_000);
    }

    #[test]
    fn threshold_is_inclusive() {
        let entries = [entry(1, 10_000, 10_000, 2)];
        let summary = summarize(&entries);
        assert_eq!(summary.subtotal, 20_000);
        assert_eq!(summary.delivery_fee, 0);
        assert_eq!(summary.remaining_for_free_delivery, 0);
    }

    #[test]
    fn markup_produces_negative_discount() {
        let entries = [entry(1, 12_000, 10_000, 1), entry(2, 5_000, 6_000, 1)];
        assert_eq!(product_total(&entries), 16_000);
        assert_eq!(discount_total(&entries), -1_000);
        assert_eq!(summarize(&entries).subtotal, 17_000);
    }

    #[test]
    fn custom_policy_changes_fee_and_threshold() {
        let policy = PricingPolicy {
            free_threshold: 50_000,
            delivery_fee: 2_500,
        };
        let entries = [entry(1, 10_000, 10_000, 3)];
        let summary = policy.summarize(&entries);
        assert_eq!(summary.delivery_fee, 2_500);
        assert_eq!(summary.final_total, 32_500);
        assert_eq!(summary.remaining_for_free_delivery, 20_000);
    }

    #[test]
    fn oversized_totals_saturate_instead_of_overflowing() {
        let huge = i64::MAX / 2;
        let entries = [entry(1, huge, huge, 1), entry(2, huge, huge, 3)];

        let summary = summarize(&entries);
        assert_eq!(summary.product_total, i64::MAX);
        assert_eq!(summary.discount_total, 0);
        assert_eq!(summary.delivery_fee, 0);
        assert_eq!(summary.final_total, i64::MAX);
        assert_eq!(summary.remaining_for_free_delivery, 0);
    }
}
