use thiserror::Error;

/// Caller and state errors raised before any SDK call is made.
///
/// Each variant carries a stable `code` the application switches on; the
/// `Display` text is the human-readable message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("Could not parse {key}: {value}")]
    InvalidDate { key: String, value: String },

    #[error("Could not call {operation}. make sure you are passing a valid connection")]
    ConnectionType { operation: String },

    #[error("Terra not initialised. Please run initTerra first")]
    NotInitialised,

    #[error("Please make sure the workoutId is a valid UUID")]
    InvalidUuid,

    #[error("Please make sure the platform version is {min} and above")]
    PlatformVersion { min: String },

    #[error("Could not parse the payload. Please make sure the payload is in the correct format {reason}")]
    PlannedWorkoutPayload { reason: String, payload: String },
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "Invalid Arguments",
            Self::InvalidDate { .. } => "Invalid Date",
            Self::ConnectionType { .. } => "Connection Type Error",
            Self::NotInitialised => "Terra not initialised",
            Self::InvalidUuid => "Invalid UUID",
            Self::PlatformVersion { .. } => "Platform Version Error",
            Self::PlannedWorkoutPayload { .. } => "PlannedWorkoutPayload Error",
        }
    }

    /// Diagnostic payload returned next to the message, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::PlannedWorkoutPayload { payload, .. } => Some(payload.clone()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Health error: {0}")]
    Health(#[from] core_health::HealthError),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let err = DispatchError::InvalidDate {
            key: "startDate".into(),
            value: "yesterday".into(),
        };
        assert_eq!(err.code(), "Invalid Date");
        assert_eq!(err.to_string(), "Could not parse startDate: yesterday");

        let err = DispatchError::PlatformVersion { min: "17.0".into() };
        assert_eq!(err.code(), "Platform Version Error");
        assert_eq!(
            err.to_string(),
            "Please make sure the platform version is 17.0 and above"
        );

        assert_eq!(
            DispatchError::NotInitialised.to_string(),
            "Terra not initialised. Please run initTerra first"
        );
    }

    #[test]
    fn test_only_payload_errors_carry_details() {
        let err = DispatchError::PlannedWorkoutPayload {
            reason: "EOF while parsing".into(),
            payload: "{".into(),
        };
        assert_eq!(err.details(), Some("{".to_string()));
        assert_eq!(DispatchError::InvalidUuid.details(), None);
    }
}
