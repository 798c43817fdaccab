//! Cart engine: authoritative in-memory cart with persisted snapshots.
//!
//! # Responsibility
//! - Own the ordered list of cart entries and every mutation on it.
//! - Persist a full snapshot after each mutation through a [`CartStore`].
//! - Expose derived views (item count, selection, checkout summary).
//!
//! # Invariants
//! - One entry per product; re-adding bumps quantity.
//! - Quantity never drops below 1.
//! - Entry ids come from a counter owned by this engine instance and are
//!   never reused while the entry exists.
//! - Hydration reads the store once and does not write back.
//! - Insertion order is preserved; only removals change positions.

use crate::config::PricingPolicy;
use crate::model::cart::{AiDecision, CartEntry, CartEntryId, MAX_ENTRY_ID};
use crate::model::product::Product;
use crate::repo::cart_repo::CartStore;
use crate::service::pricing::CheckoutSummary;
use log::{debug, warn};

/// Single owner of cart state for one session.
pub struct CartEngine<S: CartStore> {
    store: S,
    entries: Vec<CartEntry>,
    next_id: CartEntryId,
    pricing: PricingPolicy,
}

impl<S: CartStore> CartEngine<S> {
    /// Creates an empty engine without reading the store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: Vec::new(),
            next_id: 1,
            pricing: PricingPolicy::default(),
        }
    }

    /// Creates an engine seeded from the store's last snapshot.
    ///
    /// The id counter resumes at the largest stored id plus one. A snapshot
    /// whose ids leave no room above [`MAX_ENTRY_ID`] is discarded.
    pub fn hydrate(store: S) -> Self {
        let mut entries = store.load();
        let resumed = entries
            .iter()
            .map(|entry| entry.entry_id)
            .max()
            .map_or(Some(1), |max| max.checked_add(1))
            .filter(|next_id| *next_id <= MAX_ENTRY_ID + 1);
        let next_id = match resumed {
            Some(next_id) => next_id,
            None => {
                warn!(
                    "event=cart_hydrate module=service status=discarded reason=id_exhausted entries={}",
                    entries.len()
                );
                entries.clear();
                1
            }
        };
        debug!(
            "event=cart_hydrate module=service status=ok entries={} next_id={next_id}",
            entries.len()
        );

        Self {
            store,
            entries,
            next_id,
            pricing: PricingPolicy::default(),
        }
    }

    /// Replaces the delivery pricing used by [`CartEngine::summary`].
    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, entry_id: CartEntryId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.entry_id == entry_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one unit of `product`.
    ///
    /// # Contract
    /// - Existing product: quantity + 1; verdict fields overwritten only by
    ///   supplied values.
    /// - New product: appended, quantity 1, selected, fresh id.
    /// - Returns the id of the affected entry.
    pub fn add(
        &mut self,
        product: &Product,
        ai_decision: Option<AiDecision>,
        ai_reason: Option<String>,
    ) -> CartEntryId {
        let existing = self
            .entries
            .iter()
            .position(|entry| entry.product_id() == product.product_id);
        let entry_id = match existing {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_add(1);
                if ai_decision.is_some() {
                    entry.ai_decision = ai_decision;
                }
                if ai_reason.is_some() {
                    entry.ai_reason = ai_reason;
                }
                entry.entry_id
            }
            None => {
                let entry_id = self.next_id;
                self.next_id += 1;
                let mut entry = CartEntry::new(entry_id, product.clone());
                entry.ai_decision = ai_decision;
                entry.ai_reason = ai_reason;
                self.entries.push(entry);
                entry_id
            }
        };

        debug!(
            "event=cart_add module=service status=ok entry_id={entry_id} product_id={}",
            product.product_id
        );
        self.persist();
        entry_id
    }

    /// Deletes one entry. Unknown ids are ignored.
    pub fn remove(&mut self, entry_id: CartEntryId) {
        self.entries.retain(|entry| entry.entry_id != entry_id);
        self.persist();
    }

    /// Sets an entry's quantity. Values below 1 or above `u32::MAX` are
    /// ignored.
    pub fn set_quantity(&mut self, entry_id: CartEntryId, quantity: i64) {
        let quantity = match u32::try_from(quantity) {
            Ok(quantity) if quantity >= 1 => quantity,
            _ => {
                debug!(
                    "event=cart_set_quantity module=service status=rejected entry_id={entry_id} quantity={quantity}"
                );
                return;
            }
        };
        if let Some(entry) = self.entry_mut(entry_id) {
            entry.quantity = quantity;
        }
        self.persist();
    }

    /// Adds one unit to an entry.
    pub fn increment(&mut self, entry_id: CartEntryId) {
        if let Some(quantity) = self.get(entry_id).map(|entry| entry.quantity) {
            self.set_quantity(entry_id, i64::from(quantity) + 1);
        }
    }

    /// Removes one unit from an entry; stays at 1.
    pub fn decrement(&mut self, entry_id: CartEntryId) {
        if let Some(quantity) = self.get(entry_id).map(|entry| entry.quantity) {
            self.set_quantity(entry_id, i64::from(quantity) - 1);
        }
    }

    /// Flips one entry's selection. Unknown ids are ignored.
    pub fn toggle_selected(&mut self, entry_id: CartEntryId) {
        if let Some(entry) = self.entry_mut(entry_id) {
            entry.selected = !entry.selected;
        }
        self.persist();
    }

    pub fn set_all_selected(&mut self, selected: bool) {
        for entry in &mut self.entries {
            entry.selected = selected;
        }
        self.persist();
    }

    /// Deletes every selected entry.
    pub fn remove_selected(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.selected);
        debug!(
            "event=cart_remove_selected module=service status=ok removed={}",
            before - self.entries.len()
        );
        self.persist();
    }

    /// Sum of quantities over all entries, selected or not.
    pub fn total_item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Selected entries in cart order.
    pub fn selected_entries(&self) -> Vec<&CartEntry> {
        self.entries.iter().filter(|entry| entry.selected).collect()
    }

    /// True when the cart is non-empty and every entry is selected.
    pub fn all_selected(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|entry| entry.selected)
    }

    /// Checkout totals over the current selection.
    pub fn summary(&self) -> CheckoutSummary {
        self.pricing.summarize(self.selected_entries())
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn entry_mut(&mut self, entry_id: CartEntryId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.entry_id == entry_id)
    }

    fn persist(&self) {
        self.store.save(&self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::CartEngine;
    use crate::model::cart::{AiDecision, CartEntry, MAX_ENTRY_ID};
    use crate::model::product::Product;
    use crate::repo::cart_repo::CartStore;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingStore {
        seeded: Vec<CartEntry>,
        saved: RefCell<Option<Vec<CartEntry>>>,
        saves: Cell<usize>,
    }

    impl CartStore for RecordingStore {
        fn load(&self) -> Vec<CartEntry> {
            self.seeded.clone()
        }

        fn save(&self, entries: &[CartEntry]) {
            self.saves.set(self.saves.get() + 1);
            *self.saved.borrow_mut() = Some(entries.to_vec());
        }
    }

    fn product(id: i64) -> Product {
        Product::new(id, format!("product {id}"), "brand", 1, 8_000, 10_000)
    }

    #[test]
    fn add_keeps_existing_verdict_unless_new_one_supplied() {
        let mut engine = CartEngine::new(RecordingStore::default());
        let id = engine.add(
            &product(1),
            Some(AiDecision::Caution),
            Some("sodium".to_string()),
        );
        engine.add(&product(1), None, None);

        let entry = engine.get(id).unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.ai_decision, Some(AiDecision::Caution));
        assert_eq!(entry.ai_reason.as_deref(), Some("sodium"));

        engine.add(&product(1), Some(AiDecision::Safe), None);
        let entry = engine.get(id).unwrap();
        assert_eq!(entry.ai_decision, Some(AiDecision::Safe));
        assert_eq!(entry.ai_reason.as_deref(), Some("sodium"));
    }

    #[test]
    fn every_mutation_saves_but_hydrate_does_not() {
        let mut seeded = CartEntry::new(4, product(9));
        seeded.quantity = 2;
        let store = RecordingStore {
            seeded: vec![seeded],
            ..RecordingStore::default()
        };

        let mut engine = CartEngine::hydrate(store);
        assert_eq!(engine.store().saves.get(), 0);

        let id = engine.add(&product(1), None, None);
        assert_eq!(id, 5);
        engine.toggle_selected(id);
        engine.set_all_selected(true);
        engine.set_quantity(id, 3);
        engine.remove(id);
        assert_eq!(engine.store().saves.get(), 5);

        let saved = engine.store().saved.borrow().clone().unwrap();
        assert_eq!(saved, engine.entries().to_vec());
    }

    #[test]
    fn decrement_stops_at_one() {
        let mut engine = CartEngine::new(RecordingStore::default());
        let id = engine.add(&product(1), None, None);

        engine.increment(id);
        assert_eq!(engine.get(id).unwrap().quantity, 2);
        engine.decrement(id);
        engine.decrement(id);
        engine.decrement(id);
        assert_eq!(engine.get(id).unwrap().quantity, 1);
    }

    #[test]
    fn all_selected_is_false_for_empty_cart() {
        let mut engine = CartEngine::new(RecordingStore::default());
        assert!(!engine.all_selected());

        let first = engine.add(&product(1), None, None);
        engine.add(&product(2), None, None);
        assert!(engine.all_selected());

        engine.toggle_selected(first);
        assert!(!engine.all_selected());
    }

    #[test]
    fn summary_only_counts_selected_entries() {
        let mut engine = CartEngine::new(RecordingStore::default());
        let first = engine.add(&product(1), None, None);
        engine.add(&product(2), None, None);
        engine.toggle_selected(first);

        let summary = engine.summary();
        assert_eq!(summary.subtotal, 8_000);
        assert_eq!(summary.delivery_fee, 3_000);
        assert_eq!(engine.total_item_count(), 2);
    }

    #[test]
    fn hydrate_discards_snapshot_without_room_for_new_ids() {
        let store = RecordingStore {
            seeded: vec![CartEntry::new(u64::MAX, product(1))],
            ..RecordingStore::default()
        };
        let mut engine = CartEngine::hydrate(store);
        assert!(engine.is_empty());
        assert_eq!(engine.add(&product(2), None, None), 1);

        let store = RecordingStore {
            seeded: vec![CartEntry::new(MAX_ENTRY_ID, product(1))],
            ..RecordingStore::default()
        };
        let mut engine = CartEngine::hydrate(store);
        assert_eq!(engine.add(&product(2), None, None), MAX_ENTRY_ID + 1);
    }

    #[test]
    fn quantity_above_u32_range_is_ignored() {
        let mut engine = CartEngine::new(RecordingStore::default());
        let id = engine.add(&product(1), None, None);
        engine.set_quantity(id, i64::from(u32::MAX) + 1);
        assert_eq!(engine.get(id).unwrap().quantity, 1);
    }
}
