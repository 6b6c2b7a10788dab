//! # Background Event Buffer
//!
//! Bounded, durable FIFO of health updates collected whether or not the
//! application is listening. The whole queue lives as one JSON array under a
//! single settings key:
//!
//! ```json
//! [{"dataType": "STEPS", "lastUpdated": 1700000000.0,
//!   "samples": [{"value": 42.0, "timestamp": 1699999990.5}],
//!   "capturedAt": 1700000001.25}]
//! ```
//!
//! Appends and read-and-clear are serialised by one async mutex; the store
//! is never touched outside it.
//!
//! Entries that no longer decode are moved to `<key>.quarantine.<millis>`
//! one by one; a slot that is not a JSON array at all is moved there whole.
//! Nothing is overwritten unread.

use crate::error::Result;
use bridge_traits::health::HealthUpdate;
use bridge_traits::storage::SettingsStore;
use bridge_traits::time::Clock;
use core_runtime::config::BridgeConfig;
use core_runtime::events::HealthUpdateEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Persisted snapshot of an update plus the moment it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferedEvent {
    #[serde(flatten)]
    pub event: HealthUpdateEvent,
    pub captured_at: f64,
}

pub struct BackgroundEventBuffer {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    key: String,
    capacity: usize,
    lock: Mutex<()>,
}

impl BackgroundEventBuffer {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            store,
            clock,
            key: key.into(),
            capacity: capacity.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            Arc::clone(&config.settings_store),
            Arc::clone(&config.clock),
            config.background_events_key.clone(),
            config.background_event_capacity,
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an update, evicting the oldest entries beyond capacity.
    ///
    /// Returns the number of buffered events after the append.
    pub async fn append(&self, update: &HealthUpdate) -> Result<usize> {
        let entry = BufferedEvent {
            event: HealthUpdateEvent::from(update),
            captured_at: self.clock.epoch_seconds(),
        };

        let _guard = self.lock.lock().await;

        let stored = self.store.get_string(&self.key).await?;
        let mut events = self.load(stored).await?;
        events.push(entry);

        if events.len() > self.capacity {
            let excess = events.len() - self.capacity;
            events.drain(..excess);
            debug!(evicted = excess, "Evicted oldest background events");
        }

        let encoded = serde_json::to_string(&events)?;
        self.store.set_string(&self.key, &encoded).await?;

        debug!(total = events.len(), "Stored event in background buffer");
        Ok(events.len())
    }

    /// Hand back every buffered event in arrival order and empty the slot.
    pub async fn read_and_clear(&self) -> Result<Vec<BufferedEvent>> {
        let _guard = self.lock.lock().await;

        let stored = self.store.take_string(&self.key).await?;
        let events = self.load(stored).await?;

        debug!(count = events.len(), "Drained background buffer");
        Ok(events)
    }

    pub async fn len(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let stored = self.store.get_string(&self.key).await?;
        Ok(stored
            .as_deref()
            .and_then(|raw| self.decode(raw))
            .map_or(0, |(events, _)| events.len()))
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Key an unreadable slot is moved to before being replaced.
    pub fn quarantine_key(&self) -> String {
        format!("{}.quarantine.{}", self.key, self.clock.now().timestamp_millis())
    }

    async fn load(&self, stored: Option<String>) -> Result<Vec<BufferedEvent>> {
        let Some(raw) = stored else {
            return Ok(Vec::new());
        };

        let (events, rejected) = match self.decode(&raw) {
            Some((events, rejected)) if rejected.is_empty() => return Ok(events),
            Some((events, rejected)) => (events, serde_json::to_string(&rejected)?),
            None => (Vec::new(), raw),
        };

        let quarantine = self.quarantine_key();
        self.store.set_string(&quarantine, &rejected).await?;
        error!(
            key = %self.key,
            quarantine = %quarantine,
            kept = events.len(),
            "Moved unreadable background events aside"
        );
        Ok(events)
    }

    /// Split the slot into readable events and the raw entries that failed.
    /// `None` when the slot is not a JSON array at all.
    fn decode(&self, raw: &str) -> Option<(Vec<BufferedEvent>, Vec<Value>)> {
        let entries: Vec<Value> = serde_json::from_str(raw).ok()?;

        let mut events = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for entry in entries {
            match serde_json::from_value::<BufferedEvent>(entry.clone()) {
                Ok(event) => events.push(event),
                Err(err) => {
                    warn!(key = %self.key, error = %err, "Unreadable background event");
                    rejected.push(entry);
                }
            }
        }
        Some((events, rejected))
    }
}

impl std::fmt::Debug for BackgroundEventBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundEventBuffer")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Log-and-continue wrapper used on the update path.
pub(crate) async fn append_logged(buffer: &BackgroundEventBuffer, update: &HealthUpdate) {
    if let Err(err) = buffer.append(update).await {
        warn!(data_type = %update.data_type, error = %err, "Failed to store background event");
    }
}
