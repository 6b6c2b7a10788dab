//! Host platform capability checks.
//!
//! Some SDK features only exist on recent OS releases (planned workouts need
//! iOS 17). The host reports its version through [`PlatformCapabilities`] and
//! the core gates those features before contacting the SDK.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `major.minor` operating system version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
}

impl PlatformVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Version used by hosts without OS-level feature gating.
    pub const UNRESTRICTED: PlatformVersion = PlatformVersion::new(u32::MAX, 0);

    pub fn is_at_least(&self, other: PlatformVersion) -> bool {
        *self >= other
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Host-reported platform information.
pub trait PlatformCapabilities: Send + Sync {
    /// Human-readable platform name, e.g. "iOS"
    fn platform_name(&self) -> &str;

    /// Running OS version
    fn os_version(&self) -> PlatformVersion;

    fn supports(&self, minimum: PlatformVersion) -> bool {
        self.os_version().is_at_least(minimum)
    }
}
