use thiserror::Error;

/// Failures while assembling the bridge runtime.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid bridge configuration: {0}")]
    Config(String),

    /// A host bridge was not injected and no desktop default exists.
    #[error("Host bridge `{capability}` not provided: {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The desktop default for a host bridge could not be built.
    #[error("Default host bridge unavailable: {0}")]
    DefaultBridge(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_missing_bridge() {
        let err = Error::CapabilityMissing {
            capability: "SettingsStore".into(),
            message: "enable desktop-shims".into(),
        };
        assert_eq!(
            err.to_string(),
            "Host bridge `SettingsStore` not provided: enable desktop-shims"
        );
        assert_eq!(
            Error::Config("capacity must be positive".into()).to_string(),
            "Invalid bridge configuration: capacity must be positive"
        );
    }
}
