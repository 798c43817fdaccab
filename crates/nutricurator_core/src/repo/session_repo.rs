//! Session snapshot persistence adapter.
//!
//! Same discipline as the cart adapter: tolerant load, overwrite save,
//! failures logged and dropped. A snapshot missing either half loads as
//! logged out.

use crate::config::AUTH_SLOT_KEY;
use crate::model::account::{HealthProfile, SessionSnapshot, User};
use crate::repo::slot_store::SlotStore;
use log::warn;
use serde::Deserialize;

#[derive(Deserialize)]
struct StoredSession {
    #[serde(default)]
    user: Option<User>,
    #[serde(default, rename = "healthProfile")]
    health_profile: Option<HealthProfile>,
}

pub struct SessionStore<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> SessionStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Returns the persisted session, or `None` when logged out.
    pub fn load(&self) -> Option<SessionSnapshot> {
        let raw = match self.slots.get(AUTH_SLOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("event=session_load module=repo status=fallback error={err}");
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(StoredSession {
                user: Some(user),
                health_profile: Some(health_profile),
            }) => Some(SessionSnapshot {
                user,
                health_profile,
            }),
            Ok(_) => None,
            Err(err) => {
                warn!("event=session_load module=repo status=fallback error={err}");
                None
            }
        }
    }

    /// Overwrites the session slot.
    pub fn save(&self, snapshot: &SessionSnapshot) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=session_save module=repo status=error error_code=encode_failed error={err}");
                return;
            }
        };
        if let Err(err) = self.slots.put(AUTH_SLOT_KEY, &payload) {
            warn!("event=session_save module=repo status=error error_code=write_failed error={err}");
        }
    }

    /// Removes the session slot.
    pub fn clear(&self) {
        if let Err(err) = self.slots.remove(AUTH_SLOT_KEY) {
            warn!("event=session_clear module=repo status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use crate::config::AUTH_SLOT_KEY;
    use crate::db::open_db_in_memory;
    use crate::repo::slot_store::{SlotStore, SqliteSlotStore};

    #[test]
    fn half_populated_or_malformed_snapshot_is_logged_out() {
        let conn = open_db_in_memory().unwrap();
        let slots = SqliteSlotStore::new(&conn);
        let store = SessionStore::new(&slots);

        assert!(store.load().is_none());

        slots.put(AUTH_SLOT_KEY, "{\"user\":null}").unwrap();
        assert!(store.load().is_none());

        slots.put(AUTH_SLOT_KEY, "[1,2,3]").unwrap();
        assert!(store.load().is_none());
    }
}
