//! SDK update delivery: background buffer and live subscriber.

mod common;

use bridge_desktop::ChannelEventSink;
use bridge_traits::health::{DataType, HealthUpdate};
use chrono::{TimeZone, Utc};
use common::*;
use core_service::MethodResponse;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn drain(service: &core_service::BridgeService) -> Vec<Value> {
    let reply = service.handle("getBackgroundHealthEvents", json!({})).await;
    let MethodResponse::Success(Value::String(text)) = reply else {
        panic!("expected JSON text, got {reply:?}");
    };
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_new_registers_update_handler() {
    let (sdk, slot) = sdk_with_session(MockSession::new());
    let _service = service_with(sdk).await;
    assert!(slot.lock().unwrap().is_some());
}

#[tokio::test]
async fn test_updates_are_buffered_and_pushed() {
    let (sdk, slot) = sdk_with_session(MockSession::new());
    let service = service_with(sdk).await;
    let (sink, mut events) = ChannelEventSink::new();
    service.attach_event_sink(Arc::new(sink));

    let handler = slot.lock().unwrap().clone().unwrap();
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    handler(
        HealthUpdate::new(DataType::Steps)
            .with_sample(120.0, at)
            .with_last_updated(at),
    );

    let pushed = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        pushed,
        json!({
            "dataType": "STEPS",
            "lastUpdated": 1_700_000_000.0,
            "samples": [{"value": 120.0, "timestamp": 1_700_000_000.0}],
        })
    );

    let buffered = drain(&service).await;
    assert_eq!(buffered.len(), 1);
    assert_eq!(buffered[0]["dataType"], "STEPS");
    assert!(buffered[0]["capturedAt"].as_f64().unwrap() > 0.0);

    assert!(drain(&service).await.is_empty());
}

#[tokio::test]
async fn test_updates_without_subscriber_are_kept_for_pickup() {
    let (sdk, slot) = sdk_with_session(MockSession::new());
    let service = service_with(sdk).await;
    let handler = slot.lock().unwrap().clone().unwrap();

    for i in 0..3 {
        handler(HealthUpdate::new(DataType::HeartRate).with_sample(60.0 + i as f64, Utc::now()));
    }

    // The pump runs on the runtime; poll until all three have landed.
    let mut waited = 0;
    while service.buffer().len().await.unwrap() < 3 && waited < 100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += 1;
    }

    let values: Vec<f64> = drain(&service)
        .await
        .iter()
        .map(|event| event["samples"][0]["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![60.0, 61.0, 62.0]);
}

#[tokio::test]
async fn test_detached_subscriber_receives_nothing() {
    let (sdk, slot) = sdk_with_session(MockSession::new());
    let service = service_with(sdk).await;
    let (sink, mut events) = ChannelEventSink::new();
    service.attach_event_sink(Arc::new(sink));
    service.detach_event_sink();
    assert!(!service.event_channel().is_attached());

    let handler = slot.lock().unwrap().clone().unwrap();
    handler(HealthUpdate::new(DataType::Calories).with_sample(12.5, Utc::now()));

    let mut waited = 0;
    while service.buffer().is_empty().await.unwrap() && waited < 100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += 1;
    }

    assert!(events.try_recv().is_err());
    assert_eq!(drain(&service).await.len(), 1);
}

#[tokio::test]
async fn test_teardown_drops_session_but_keeps_buffer() {
    let service = initialised_service(MockSession::new()).await;
    let (sink, _events) = ChannelEventSink::new();
    service.attach_event_sink(Arc::new(sink));

    service
        .buffer()
        .append(&HealthUpdate::new(DataType::Distance).with_sample(1.2, Utc::now()))
        .await
        .unwrap();

    service.teardown().await;

    assert!(!service.is_initialised().await);
    assert!(!service.event_channel().is_attached());
    assert_eq!(drain(&service).await.len(), 1);
}
