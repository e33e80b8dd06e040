//! Per-location battle cooldowns
//!
//! After a battle ends, the location is locked out for a fixed window.
//! Records live in the key-value store under `battle_cooldown_{id}` and
//! are evicted lazily: an expired or unreadable record is removed the
//! next time it is checked.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{LocationId, UnixMillis};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownRecord {
    pub cooldown_end_ms: UnixMillis,
    pub location_id: LocationId,
}

pub struct CooldownLedger {
    store: Arc<dyn KeyValueStore>,
    window_ms: u64,
}

impl CooldownLedger {
    pub fn new(store: Arc<dyn KeyValueStore>, window_seconds: u64) -> Self {
        Self {
            store,
            window_ms: window_seconds * 1000,
        }
    }

    fn key(location_id: LocationId) -> String {
        format!("battle_cooldown_{}", location_id.0)
    }

    /// Start a fresh cooldown window at `now`
    pub fn record(&self, location_id: LocationId, now: UnixMillis) -> Result<()> {
        let record = CooldownRecord {
            cooldown_end_ms: now + self.window_ms,
            location_id,
        };
        self.store
            .set(&Self::key(location_id), &serde_json::to_string(&record)?)
    }

    /// Milliseconds left on the location's cooldown, or `None` if the
    /// location is open. Expired and corrupt records are evicted here.
    pub fn remaining(&self, location_id: LocationId, now: UnixMillis) -> Result<Option<u64>> {
        let key = Self::key(location_id);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };
        let Ok(record) = serde_json::from_str::<CooldownRecord>(&raw) else {
            self.store.remove(&key)?;
            return Ok(None);
        };
        if record.cooldown_end_ms <= now {
            self.store.remove(&key)?;
            return Ok(None);
        }
        Ok(Some(record.cooldown_end_ms - now))
    }

    pub fn is_active(&self, location_id: LocationId, now: UnixMillis) -> Result<bool> {
        Ok(self.remaining(location_id, now)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn test_ledger(window_seconds: u64) -> CooldownLedger {
        CooldownLedger::new(Arc::new(MemoryStore::new()), window_seconds)
    }

    #[test]
    fn test_record_then_remaining() {
        let ledger = test_ledger(60);
        let location = LocationId(3);
        ledger.record(location, 1_000_000).unwrap();

        assert_eq!(ledger.remaining(location, 1_000_000).unwrap(), Some(60_000));
        assert_eq!(ledger.remaining(location, 1_030_000).unwrap(), Some(30_000));
        assert!(ledger.is_active(location, 1_059_999).unwrap());
    }

    #[test]
    fn test_expired_record_is_evicted() {
        let store = Arc::new(MemoryStore::new());
        let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);
        let location = LocationId(3);
        ledger.record(location, 1_000_000).unwrap();

        assert_eq!(ledger.remaining(location, 1_060_000).unwrap(), None);
        assert_eq!(store.get("battle_cooldown_3").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let store = Arc::new(MemoryStore::new());
        store.set("battle_cooldown_9", "not json").unwrap();
        let ledger = CooldownLedger::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, 60);

        assert_eq!(ledger.remaining(LocationId(9), 5_000).unwrap(), None);
        assert_eq!(store.get("battle_cooldown_9").unwrap(), None);
    }

    #[test]
    fn test_locations_cool_down_independently() {
        let ledger = test_ledger(60);
        ledger.record(LocationId(1), 0).unwrap();

        assert!(ledger.is_active(LocationId(1), 1).unwrap());
        assert!(!ledger.is_active(LocationId(2), 1).unwrap());
    }
}
