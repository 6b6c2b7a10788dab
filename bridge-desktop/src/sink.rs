//! Channel-backed event sink.

use bridge_traits::events::EventSink;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

/// [`EventSink`] that forwards every event into an unbounded Tokio channel.
///
/// Lets Rust hosts (desktop shells, integration tests) consume the health
/// update stream as an async receiver.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<Value>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: Value) {
        if self.sender.send(event).is_err() {
            warn!("Health update receiver dropped; event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_events_reach_receiver_in_order() {
        let (sink, mut rx) = ChannelEventSink::new();

        sink.send(json!({"dataType": "STEPS"}));
        sink.send(json!({"dataType": "HEART_RATE"}));

        assert_eq!(rx.recv().await.unwrap()["dataType"], "STEPS");
        assert_eq!(rx.recv().await.unwrap()["dataType"], "HEART_RATE");
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (sink, rx) = ChannelEventSink::new();
        drop(rx);
        sink.send(json!({"dataType": "STEPS"}));
    }
}
