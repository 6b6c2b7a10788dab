//! # Update Router
//!
//! Fans every SDK update out to two independent sinks:
//!
//! ```text
//!                  ┌──> BackgroundEventBuffer   (always, durable)
//! SDK ──> pump ────┤
//!                  └──> LiveEventChannel        (if attached)
//! ```
//!
//! The SDK calls its handler synchronously from its own threads, so the
//! handler only enqueues. One pump task drains the queue in arrival order,
//! which keeps buffer order equal to callback order.

use crate::buffer::{append_logged, BackgroundEventBuffer};
use crate::error::{HealthError, Result};
use bridge_traits::health::{HealthUpdate, UpdateHandler};
use core_runtime::events::LiveEventChannel;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct UpdateRouter {
    buffer: Arc<BackgroundEventBuffer>,
    channel: Arc<LiveEventChannel>,
}

impl UpdateRouter {
    pub fn new(buffer: Arc<BackgroundEventBuffer>, channel: Arc<LiveEventChannel>) -> Self {
        Self { buffer, channel }
    }

    pub fn buffer(&self) -> &Arc<BackgroundEventBuffer> {
        &self.buffer
    }

    pub fn channel(&self) -> &Arc<LiveEventChannel> {
        &self.channel
    }

    /// Persist the update, then push it to the live subscriber.
    ///
    /// Neither sink can fail the other: storage errors are logged and a
    /// missing subscriber only skips the push.
    pub async fn route(&self, update: HealthUpdate) {
        debug!(
            data_type = %update.data_type,
            samples = update.samples.len(),
            "Routing health update"
        );
        append_logged(&self.buffer, &update).await;
        self.channel.push(&update);
    }

    /// Start the pump task and return the handler to register with the SDK.
    ///
    /// Must be called from within a tokio runtime. The pump stops once every
    /// copy of the returned handler has been dropped.
    pub fn spawn_pump(self: &Arc<Self>) -> Result<UpdateHandler> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| HealthError::NoRuntime)?;
        let (sender, mut receiver) = mpsc::unbounded_channel::<HealthUpdate>();

        let router = Arc::clone(self);
        runtime.spawn(async move {
            while let Some(update) = receiver.recv().await {
                router.route(update).await;
            }
            debug!("Health update pump stopped");
        });

        let handler: UpdateHandler = Arc::new(move |update: HealthUpdate| {
            let data_type = update.data_type.clone();
            if sender.send(update).is_err() {
                warn!(data_type = %data_type, "Health update pump is gone; dropping update");
            }
        });
        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::{ChannelEventSink, SqliteSettingsStore};
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::health::DataType;
    use bridge_traits::storage::SettingsStore;
    use bridge_traits::time::SystemClock;
    use chrono::Utc;

    const KEY: &str = "terra_background_health_events";

    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn set_string(&self, _key: &str, _value: &str) -> BridgeResult<()> {
            Err(BridgeError::StorageError("disk full".into()))
        }
        async fn get_string(&self, _key: &str) -> BridgeResult<Option<String>> {
            Err(BridgeError::StorageError("disk full".into()))
        }
        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn clear_all(&self) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn router_over(store: Arc<dyn SettingsStore>) -> Arc<UpdateRouter> {
        let buffer = Arc::new(BackgroundEventBuffer::new(
            store,
            Arc::new(SystemClock),
            KEY,
            1000,
        ));
        Arc::new(UpdateRouter::new(buffer, Arc::new(LiveEventChannel::new())))
    }

    fn update(value: f64) -> HealthUpdate {
        HealthUpdate::new(DataType::HeartRate).with_sample(value, Utc::now())
    }

    #[tokio::test]
    async fn test_route_without_subscriber_still_persists() {
        let store = Arc::new(SqliteSettingsStore::in_memory().await.unwrap());
        let router = router_over(store);

        router.route(update(60.0)).await;

        assert_eq!(router.buffer().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_block_push() {
        let router = router_over(Arc::new(BrokenStore));
        let (sink, mut events) = ChannelEventSink::new();
        router.channel().attach(Arc::new(sink));

        router.route(update(72.0)).await;

        let pushed = events.recv().await.unwrap();
        assert_eq!(pushed["dataType"], "HEART_RATE");
        assert_eq!(pushed["samples"][0]["value"], 72.0);
    }

    #[tokio::test]
    async fn test_pump_preserves_callback_order() {
        let store = Arc::new(SqliteSettingsStore::in_memory().await.unwrap());
        let router = router_over(store);
        let (sink, mut events) = ChannelEventSink::new();
        router.channel().attach(Arc::new(sink));

        let handler = router.spawn_pump().unwrap();
        for i in 0..10 {
            handler(update(i as f64));
        }

        for i in 0..10 {
            let pushed = events.recv().await.unwrap();
            assert_eq!(pushed["samples"][0]["value"], i as f64);
        }

        let buffered: Vec<f64> = router
            .buffer()
            .read_and_clear()
            .await
            .unwrap()
            .iter()
            .map(|e| e.event.samples[0].value)
            .collect();
        assert_eq!(buffered, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_spawn_pump_outside_runtime_fails() {
        let router = router_over(Arc::new(BrokenStore));
        assert!(matches!(router.spawn_pump(), Err(HealthError::NoRuntime)));
    }
}
