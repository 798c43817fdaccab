//! Cart snapshot persistence adapter.
//!
//! # Responsibility
//! - Serialize the full cart into one slot after every engine mutation.
//! - Hydrate the cart from that slot, rejecting anything malformed.
//!
//! # Invariants
//! - `load` never fails: missing, non-array, undecodable or invariant-violating
//!   payloads all load as an empty cart.
//! - `save` never fails: storage errors are logged and dropped.
//! - Adapters hold no copy of the entries between calls.

use crate::config::CART_SLOT_KEY;
use crate::model::cart::{validate_entries, CartEntry};
use crate::repo::slot_store::SlotStore;
use log::{debug, warn};
use serde_json::Value;

/// Best-effort snapshot storage for the cart engine.
pub trait CartStore {
    fn load(&self) -> Vec<CartEntry>;
    fn save(&self, entries: &[CartEntry]);
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn load(&self) -> Vec<CartEntry> {
        (**self).load()
    }

    fn save(&self, entries: &[CartEntry]) {
        (**self).save(entries)
    }
}

/// Cart store writing JSON arrays into a named slot.
pub struct SlotCartStore<S: SlotStore> {
    slots: S,
    key: String,
}

impl<S: SlotStore> SlotCartStore<S> {
    /// Uses the default cart slot key.
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, CART_SLOT_KEY)
    }

    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    fn try_load(&self) -> Result<Vec<CartEntry>, String> {
        let Some(raw) = self.slots.get(&self.key).map_err(|err| err.to_string())? else {
            return Ok(Vec::new());
        };

        let value: Value = serde_json::from_str(&raw).map_err(|err| err.to_string())?;
        if !value.is_array() {
            return Err("snapshot is not an array".to_string());
        }

        let entries: Vec<CartEntry> =
            serde_json::from_value(value).map_err(|err| err.to_string())?;
        validate_entries(&entries).map_err(|err| err.to_string())?;
        Ok(entries)
    }
}

impl<S: SlotStore> CartStore for SlotCartStore<S> {
    fn load(&self) -> Vec<CartEntry> {
        match self.try_load() {
            Ok(entries) => {
                debug!(
                    "event=cart_load module=repo status=ok entries={}",
                    entries.len()
                );
                entries
            }
            Err(err) => {
                warn!(
                    "event=cart_load module=repo status=fallback slot={} error={}",
                    self.key, err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[CartEntry]) {
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=cart_save module=repo status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.slots.put(&self.key, &payload) {
            warn!(
                "event=cart_save module=repo status=error error_code=write_failed slot={} error={}",
                self.key, err
            );
        }
    }
}
