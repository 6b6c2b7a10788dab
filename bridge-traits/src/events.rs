//! Push-event sink implemented by the host.
//!
//! The host side of the health-update stream (a Flutter `EventChannel` sink,
//! a Kotlin flow, a desktop test harness). Only one sink is attached at a
//! time; the core decides when events are delivered.

use serde_json::Value;

/// Receives formatted health updates.
///
/// `send` is called synchronously on whatever thread produced the update and
/// must not block. Implementations that marshal to a UI thread should enqueue
/// and return.
pub trait EventSink: Send + Sync {
    fn send(&self, event: Value);
}
