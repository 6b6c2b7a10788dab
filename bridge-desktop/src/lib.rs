//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux) and Rust test harnesses.
//!
//! ## Overview
//!
//! - `SettingsStore` using a SQLite-backed key-value store (`sqlx`)
//! - `PlatformCapabilities` with a static, host-supplied version
//! - `EventSink` forwarding health updates into a Tokio channel
//!
//! The health SDK itself has no desktop implementation; hosts inject their
//! own [`HealthSdk`](bridge_traits::HealthSdk).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ChannelEventSink, SqliteSettingsStore, StaticPlatform};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteSettingsStore::new(SqliteSettingsStore::default_path()?).await?;
//!     let platform = StaticPlatform::desktop();
//!     let (sink, mut updates) = ChannelEventSink::new();
//!     // Use in bridge configuration
//! }
//! ```

mod platform;
mod settings;
mod sink;

pub use platform::StaticPlatform;
pub use settings::SqliteSettingsStore;
pub use sink::ChannelEventSink;
