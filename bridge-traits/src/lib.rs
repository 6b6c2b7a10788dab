//! # Host Bridge Traits
//!
//! Contracts between the health bridge core and the host platform.
//!
//! ## Overview
//!
//! This crate defines everything the core needs from the outside world but
//! cannot provide itself: the native health SDK, durable key-value storage,
//! the push-event sink of the application layer, and platform version
//! information. Each host (iOS plugin, Android plugin, desktop harness) ships
//! concrete adapters.
//!
//! ## Traits
//!
//! ### Health SDK
//! - [`HealthSdk`](health::HealthSdk) - Session factory and background update registration
//! - [`HealthSession`](health::HealthSession) - Authenticated SDK handle (getters, glucose, planned workouts)
//!
//! ### Storage & Delivery
//! - [`SettingsStore`](storage::SettingsStore) - Durable key-value slots (UserDefaults, SharedPreferences, SQLite)
//! - [`EventSink`](events::EventSink) - Single-subscriber push stream towards the application
//!
//! ### Platform Integration
//! - [`PlatformCapabilities`](platform::PlatformCapabilities) - OS version checks gating newer SDK features
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Storage, platform, sink |
//! | iOS      | host plugin         | 📋 SDK wrapper |
//! | Android  | host plugin         | 📋 Planned |
//!
//! ## Error Handling
//!
//! Storage and sink failures use [`BridgeError`](error::BridgeError). SDK
//! failures use the closed [`SdkError`](health::SdkError) enumeration so the
//! core can map each kind to a fixed message.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`; the SDK may call back from arbitrary
//! threads.

pub mod error;
pub mod events;
pub mod health;
pub mod models;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use events::EventSink;
pub use health::{
    Connection, DataType, DateRange, Fetched, HealthSdk, HealthSession, HealthUpdate, Permission,
    SdkError, SdkResult, UpdateHandler, UpdateSample,
};
pub use platform::{PlatformCapabilities, PlatformVersion};
pub use storage::SettingsStore;
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
