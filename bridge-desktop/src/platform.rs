//! Static platform information for desktop hosts.

use bridge_traits::platform::{PlatformCapabilities, PlatformVersion};

/// Platform descriptor with a fixed, host-supplied version.
///
/// Desktop hosts have no OS-level feature gating, so [`StaticPlatform::desktop`]
/// reports [`PlatformVersion::UNRESTRICTED`]. Mobile hosts that already know
/// their OS version at startup can use [`StaticPlatform::new`].
#[derive(Debug, Clone)]
pub struct StaticPlatform {
    name: String,
    version: PlatformVersion,
}

impl StaticPlatform {
    pub fn new(name: impl Into<String>, version: PlatformVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn desktop() -> Self {
        Self::new(std::env::consts::OS, PlatformVersion::UNRESTRICTED)
    }
}

impl Default for StaticPlatform {
    fn default() -> Self {
        Self::desktop()
    }
}

impl PlatformCapabilities for StaticPlatform {
    fn platform_name(&self) -> &str {
        &self.name
    }

    fn os_version(&self) -> PlatformVersion {
        self.version
    }
}
