use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Background event storage failed: {0}")]
    Storage(#[from] bridge_traits::BridgeError),

    #[error("Background event encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("No async runtime available to drive health updates")]
    NoRuntime,
}

/// Failure turning an SDK result into JSON text.
#[derive(Error, Debug)]
#[error("Error decoding data into correct format")]
pub struct CodecError(#[from] pub serde_json::Error);

pub type Result<T> = std::result::Result<T, HealthError>;
