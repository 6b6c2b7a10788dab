//! Replies handed back to the host's method channel.

use crate::error::DispatchError;
use serde_json::{json, Value};

/// Outcome of one method call. Every call produces exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// Result value (envelope object, JSON string, or `null`).
    Success(Value),
    /// Caller or state error, reported on the channel's error path.
    Error {
        code: String,
        message: String,
        details: Option<String>,
    },
    /// The method name is not part of the bridge surface.
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: Value) -> Self {
        Self::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Error code, when this is an error reply.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Flatten into a single JSON document for hosts without a typed error path.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Success(value) => value.clone(),
            Self::Error {
                code,
                message,
                details,
            } => json!({ "code": code, "message": message, "details": details }),
            Self::NotImplemented => json!({ "code": "NotImplemented" }),
        }
    }
}

impl From<DispatchError> for MethodResponse {
    fn from(err: DispatchError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}
