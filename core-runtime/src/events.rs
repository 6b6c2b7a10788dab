//! # Live Health Update Channel
//!
//! Wire model for pushed health updates and the single-subscriber channel
//! that delivers them to the application layer.
//!
//! ## Overview
//!
//! ```text
//!                       attach / detach
//!  application ────────────────────────────┐
//!                                          ▼
//!  SDK update ──push──> ┌──────────────────────────┐   send   ┌───────────┐
//!                       │     LiveEventChannel     ├─────────>│ EventSink │
//!                       │ Unattached | Attached(s) │          └───────────┘
//!                       └──────────────────────────┘
//! ```
//!
//! Unlike a broadcast bus there is no fan-out: the most recent `attach` wins
//! and `push` while unattached silently drops the event. Persisting updates
//! for later pickup is the background buffer's job, not this channel's.
//!
//! ## Wire format
//!
//! ```json
//! {"dataType": "STEPS", "lastUpdated": 1700000000.0,
//!  "samples": [{"value": 42.0, "timestamp": 1699999990.5}]}
//! ```
//!
//! Timestamps are fractional seconds since the Unix epoch; a missing
//! `lastUpdated` is sent as `0`.

use bridge_traits::events::EventSink;
use bridge_traits::health::HealthUpdate;
use bridge_traits::time::epoch_seconds;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Name of the method channel the host registers for commands.
pub const METHOD_CHANNEL: &str = "terra_flutter_bridge";

/// Name of the event channel carrying live health updates.
pub const EVENT_CHANNEL: &str = "terra_flutter_bridge/health_updates";

/// One sample in the pushed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePayload {
    pub value: f64,
    pub timestamp: f64,
}

/// Transport form of a [`HealthUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthUpdateEvent {
    pub data_type: String,
    pub last_updated: f64,
    pub samples: Vec<SamplePayload>,
}

impl HealthUpdateEvent {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "dataType": self.data_type,
            "lastUpdated": self.last_updated,
            "samples": self
                .samples
                .iter()
                .map(|s| serde_json::json!({"value": s.value, "timestamp": s.timestamp}))
                .collect::<Vec<_>>(),
        })
    }
}

/// Non-finite sample values have no JSON form and are dropped.
impl From<&HealthUpdate> for HealthUpdateEvent {
    fn from(update: &HealthUpdate) -> Self {
        let samples: Vec<SamplePayload> = update
            .samples
            .iter()
            .filter(|sample| sample.value.is_finite())
            .map(|sample| SamplePayload {
                value: sample.value,
                timestamp: epoch_seconds(sample.timestamp),
            })
            .collect();

        if samples.len() < update.samples.len() {
            warn!(
                data_type = %update.data_type,
                dropped = update.samples.len() - samples.len(),
                "Dropped non-finite health samples"
            );
        }

        Self {
            data_type: update.data_type.as_str().to_string(),
            last_updated: update.last_updated.map(epoch_seconds).unwrap_or(0.0),
            samples,
        }
    }
}

/// Single-subscriber push channel.
#[derive(Default)]
pub struct LiveEventChannel {
    sink: RwLock<Option<Arc<dyn EventSink>>>,
}

impl LiveEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber, replacing any current one.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        let mut slot = self.sink.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.replace(sink).is_some() {
            debug!("Replaced existing health update subscriber");
        } else {
            debug!("Health update subscriber attached");
        }
    }

    /// Remove the current subscriber. No-op when unattached.
    pub fn detach(&self) {
        let mut slot = self.sink.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.take().is_some() {
            debug!("Health update subscriber detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Deliver an update to the subscriber, if any.
    ///
    /// Returns whether the update was handed to a sink.
    pub fn push(&self, update: &HealthUpdate) -> bool {
        let sink = self
            .sink
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        let Some(sink) = sink else {
            warn!(
                data_type = %update.data_type,
                "No health update subscriber attached; update kept in background buffer only"
            );
            return false;
        };

        let event = HealthUpdateEvent::from(update);
        debug!(
            data_type = %event.data_type,
            samples = event.samples.len(),
            "Pushing health update"
        );
        sink.send(event.to_value());
        true
    }
}
