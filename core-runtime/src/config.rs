//! # Bridge Configuration Module
//!
//! Configuration management for the health bridge.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `BridgeConfig` holding the host bridges and tunables the core needs. It
//! fails fast when a required bridge is missing.
//!
//! ## Required Dependencies
//!
//! - `SettingsStore` - Durable storage for background health events
//! - `PlatformCapabilities` - OS version used to gate planned workouts
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - Capture timestamps (default: `SystemClock`)
//!
//! When the `desktop-shims` feature is enabled, a SQLite settings store in
//! the user data directory and an unrestricted desktop platform are injected
//! automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use std::sync::Arc;
//!
//! let config = BridgeConfig::builder()
//!     .settings_store(Arc::new(MySettingsStore))
//!     .platform(Arc::new(MyPlatform))
//!     .background_event_capacity(500)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, PlatformCapabilities, PlatformVersion, SettingsStore, SystemClock};
use std::sync::Arc;

/// Settings key holding the background event buffer.
pub const DEFAULT_BACKGROUND_EVENTS_KEY: &str = "terra_background_health_events";

/// Maximum number of buffered background events.
pub const DEFAULT_BACKGROUND_EVENT_CAPACITY: usize = 1000;

/// Upper bound accepted for the buffer capacity. The whole buffer is one
/// JSON document, rewritten on every append.
pub const MAX_BACKGROUND_EVENT_CAPACITY: usize = 100_000;

/// First OS version exposing the planned-workout APIs (iOS 17).
pub const DEFAULT_PLANNED_WORKOUTS_MIN_VERSION: PlatformVersion = PlatformVersion::new(17, 0);

/// What to report when an SDK call succeeded but its result could not be
/// encoded to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeFailurePolicy {
    /// Echo the SDK's own success flag next to the error message. Existing
    /// application code expects this shape.
    #[default]
    MirrorCall,
    /// Always report `success: false` with the error message.
    ForceFailure,
}

/// Configuration for the health bridge.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Durable storage for buffered background events (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Host platform information (required)
    pub platform: Arc<dyn PlatformCapabilities>,

    /// Time source for capture timestamps
    pub clock: Arc<dyn Clock>,

    /// Maximum number of buffered background events
    pub background_event_capacity: usize,

    /// Settings key the buffer is stored under
    pub background_events_key: String,

    /// Minimum OS version for planned-workout operations
    pub planned_workouts_min_version: PlatformVersion,

    pub encode_failure_policy: EncodeFailurePolicy,
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("settings_store", &"SettingsStore { ... }")
            .field(
                "platform",
                &format!(
                    "{} {}",
                    self.platform.platform_name(),
                    self.platform.os_version()
                ),
            )
            .field("background_event_capacity", &self.background_event_capacity)
            .field("background_events_key", &self.background_events_key)
            .field(
                "planned_workouts_min_version",
                &self.planned_workouts_min_version,
            )
            .field("encode_failure_policy", &self.encode_failure_policy)
            .finish()
    }
}

impl BridgeConfig {
    /// Creates a new builder for constructing a `BridgeConfig`.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Buffer capacity is > 0 and within [`MAX_BACKGROUND_EVENT_CAPACITY`]
    /// - Buffer key is not blank
    pub fn validate(&self) -> Result<()> {
        if self.background_event_capacity == 0 {
            return Err(Error::Config(
                "Background event capacity must be greater than 0".to_string(),
            ));
        }

        if self.background_event_capacity > MAX_BACKGROUND_EVENT_CAPACITY {
            return Err(Error::Config(format!(
                "Background event capacity exceeds maximum of {}",
                MAX_BACKGROUND_EVENT_CAPACITY
            )));
        }

        if self.background_events_key.trim().is_empty() {
            return Err(Error::Config(
                "Background events key cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether planned-workout operations are available on this host.
    pub fn supports_planned_workouts(&self) -> bool {
        self.platform.supports(self.planned_workouts_min_version)
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for background health events. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default SqliteSettingsStore. \
                 Mobile: inject platform-native settings (UserDefaults/SharedPreferences)."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn platform_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlatformCapabilities".to_string(),
        message: "PlatformCapabilities implementation is required to gate planned workouts. \
                 Desktop: ensure the 'desktop-shims' feature is enabled. \
                 Mobile: report the running OS version."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store() -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::SqliteSettingsStore;
    use std::thread;
    use tokio::runtime::{Handle, Runtime};

    let path = SqliteSettingsStore::default_path()
        .map_err(|e| Error::DefaultBridge(format!("No default settings location: {}", e)))?;

    let init_store = move || -> Result<SqliteSettingsStore> {
        let runtime = Runtime::new().map_err(|e| {
            Error::DefaultBridge(format!(
                "Failed to create Tokio runtime for default settings store: {}",
                e
            ))
        })?;

        runtime
            .block_on(SqliteSettingsStore::new(path))
            .map_err(|e| {
                Error::DefaultBridge(format!("Failed to initialize default SettingsStore: {}", e))
            })
    };

    // A nested runtime cannot be driven from inside an existing one.
    let store = match Handle::try_current() {
        Ok(_) => thread::spawn(init_store).join().map_err(|_| {
            Error::DefaultBridge(
                "Worker thread panicked while creating default SettingsStore".to_string(),
            )
        })??,
        Err(_) => init_store()?,
    };

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store() -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_platform() -> Result<Arc<dyn PlatformCapabilities>> {
    let platform: Arc<dyn PlatformCapabilities> =
        Arc::new(bridge_desktop::StaticPlatform::desktop());
    Ok(platform)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_platform() -> Result<Arc<dyn PlatformCapabilities>> {
    Err(platform_missing_error())
}

/// Builder for constructing [`BridgeConfig`] instances.
#[derive(Default)]
pub struct BridgeConfigBuilder {
    settings_store: Option<Arc<dyn SettingsStore>>,
    platform: Option<Arc<dyn PlatformCapabilities>>,
    clock: Option<Arc<dyn Clock>>,
    background_event_capacity: Option<usize>,
    background_events_key: Option<String>,
    planned_workouts_min_version: Option<PlatformVersion>,
    encode_failure_policy: EncodeFailurePolicy,
}

impl BridgeConfigBuilder {
    /// Sets the settings store implementation (required).
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the platform capabilities implementation (required).
    pub fn platform(mut self, platform: Arc<dyn PlatformCapabilities>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the time source used for capture timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the maximum number of buffered background events.
    ///
    /// Default: 1000
    pub fn background_event_capacity(mut self, capacity: usize) -> Self {
        self.background_event_capacity = Some(capacity);
        self
    }

    /// Sets the settings key used for the background buffer.
    pub fn background_events_key(mut self, key: impl Into<String>) -> Self {
        self.background_events_key = Some(key.into());
        self
    }

    /// Sets the minimum OS version for planned-workout operations.
    ///
    /// Default: 17.0
    pub fn planned_workouts_min_version(mut self, version: PlatformVersion) -> Self {
        self.planned_workouts_min_version = Some(version);
        self
    }

    pub fn encode_failure_policy(mut self, policy: EncodeFailurePolicy) -> Self {
        self.encode_failure_policy = policy;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityMissing` if a required bridge is absent and no
    ///   desktop default is available
    /// - `Error::Config` if a tunable is out of range
    pub fn build(self) -> Result<BridgeConfig> {
        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store()?,
        };

        let platform = match self.platform {
            Some(platform) => platform,
            None => provide_default_platform()?,
        };

        let config = BridgeConfig {
            settings_store,
            platform,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            background_event_capacity: self
                .background_event_capacity
                .unwrap_or(DEFAULT_BACKGROUND_EVENT_CAPACITY),
            background_events_key: self
                .background_events_key
                .unwrap_or_else(|| DEFAULT_BACKGROUND_EVENTS_KEY.to_string()),
            planned_workouts_min_version: self
                .planned_workouts_min_version
                .unwrap_or(DEFAULT_PLANNED_WORKOUTS_MIN_VERSION),
            encode_failure_policy: self.encode_failure_policy,
        };

        config.validate()?;
        Ok(config)
    }
}
