//! Result Codec
//!
//! Turns SDK results into the envelopes the application receives. Domain
//! objects travel as JSON *text* inside the envelope (`data`), so the
//! application decodes them with its own models.
//!
//! | Outcome                      | Envelope |
//! |------------------------------|----------|
//! | getter succeeded             | `{success, data: "<json>"}` |
//! | getter succeeded, bad encode | `{success, error: "Error decoding data into correct format"}` |
//! | getter failed                | `{success: false, data: null, error: "<message>"}` |
//! | write succeeded              | `{success}` |
//! | write failed                 | `{success: false, error: "<message>"}` |

use crate::error::CodecError;
use bridge_traits::health::SdkError;
use core_runtime::config::EncodeFailurePolicy;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// Message reported when a successful result cannot be encoded.
pub const ENCODE_FAILURE_MESSAGE: &str = "Error decoding data into correct format";

/// Message for SDK error kinds this bridge does not know.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error Type. Please contact dev@tryterra.co";

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Envelope for a getter that returned data.
pub fn data_envelope<T: Serialize + ?Sized>(
    success: bool,
    data: &T,
    policy: EncodeFailurePolicy,
) -> Value {
    match encode(data) {
        Ok(text) => json!({ "success": success, "data": text }),
        Err(err) => {
            warn!(error = %err.0, "Failed to encode SDK result");
            let reported = match policy {
                EncodeFailurePolicy::MirrorCall => success,
                EncodeFailurePolicy::ForceFailure => false,
            };
            json!({ "success": reported, "error": ENCODE_FAILURE_MESSAGE })
        }
    }
}

/// Envelope for a getter whose SDK call failed.
pub fn sdk_error_envelope(error: &SdkError) -> Value {
    json!({ "success": false, "data": Value::Null, "error": map_error(error) })
}

/// Envelope for write operations that only report a flag.
pub fn status_envelope(outcome: Result<bool, SdkError>) -> Value {
    match outcome {
        Ok(success) => json!({ "success": success }),
        Err(error) => json!({ "success": false, "error": map_error(&error) }),
    }
}

/// JSON text, or `null` when encoding fails. Used by the glucose calls.
pub fn encode_optional<T: Serialize + ?Sized>(value: &T) -> Value {
    match encode(value) {
        Ok(text) => Value::String(text),
        Err(err) => {
            warn!(error = %err.0, "Failed to encode glucose result");
            Value::Null
        }
    }
}

pub fn map_error(error: &SdkError) -> &'static str {
    match error {
        SdkError::HealthKitUnavailable => "Health Kit Unavailable",
        SdkError::ServiceUnavailable => "Service Unavailable",
        SdkError::Unauthenticated => "Unauthenticated",
        SdkError::InvalidUserId => "Invalid User ID",
        SdkError::InvalidDevId => "Invalid Dev ID",
        SdkError::Forbidden => "Forbidden",
        SdkError::BadRequest => "Bad Request",
        SdkError::UnknownOpcode => "Unknown Op Code",
        SdkError::UnexpectedError => "Unexpected Error",
        SdkError::NfcError => "NFC Error",
        SdkError::SensorExpired => "Sensor Expired",
        SdkError::SensorReadingFailed => "Sensor Reading Failed",
        SdkError::NoInternet => "No Internet",
        SdkError::UserLimitsReached => "User Limit Reached",
        SdkError::IncorrectDevId => "Incorrect Dev ID",
        SdkError::InvalidToken => "Invalid Token",
        SdkError::HealthKitAuthorizationError => "Health Kit Authorization Error",
        SdkError::UnsupportedResource => "Unsupported Resource",
        SdkError::Other(_) => UNKNOWN_ERROR_MESSAGE,
    }
}
