//! Error types for the bit.ly API client.
//!
//! # Design
//! Parameter errors are raised before any request leaves the process, so they
//! name the offending parameter and operation precisely. Transport failures
//! and service-level rejections get separate variants: callers can tell "the
//! service answered but refused" (`Api`) from "the service was unreachable"
//! (`Transport`).

use thiserror::Error;

/// Everything that can go wrong while building, sending or parsing a call.
#[derive(Debug, Error)]
pub enum BitlyError {
    /// Credentials are missing or empty; the client cannot be constructed.
    #[error("Invalid API access information. A login and an API key are needed.")]
    Config,

    #[error("Unknown method {0}.")]
    UnknownOperation(String),

    #[error("Required parameter {param} not found for method {operation}.")]
    MissingRequiredParam { param: String, operation: String },

    #[error("One of this parameter is needed for the method {operation}: {}", .candidates.join(", "))]
    MissingSwitchParam {
        operation: String,
        candidates: Vec<String>,
    },

    /// Two alternative names of the same switch parameter were supplied.
    /// `first` is the one met first in declared switch order.
    #[error(
        "Redundant parameter {second} was found whereas the parameter {first} was already passed for method {operation}. Please remove one of them."
    )]
    RedundantParam {
        first: String,
        second: String,
        operation: String,
    },

    #[error("Unexpected parameters passed to method {operation}: {}", .params.join(", "))]
    UnexpectedParams {
        operation: String,
        params: Vec<String>,
    },

    /// Neither an override nor a declared default exists for `axis`
    /// (`format` or `method`).
    #[error("Incorrect setting name \"{axis}\" for method {operation}.")]
    InvalidAxis {
        axis: &'static str,
        operation: String,
    },

    #[error("The method \"{0}\" is not a valid transport method.")]
    UnsupportedVerb(String),

    #[error("The format \"{0}\" is not a supported response format.")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body did not decode as the announced format.
    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BitlyError {
    /// True for the errors raised by parameter validation, i.e. caller
    /// mistakes detected before any network call.
    pub fn is_param_error(&self) -> bool {
        matches!(
            self,
            BitlyError::UnknownOperation(_)
                | BitlyError::MissingRequiredParam { .. }
                | BitlyError::MissingSwitchParam { .. }
                | BitlyError::RedundantParam { .. }
                | BitlyError::UnexpectedParams { .. }
        )
    }
}

/// Error envelope reported by the service itself (`statusCode != "OK"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bit.ly returned {status_code} ({code}): {message}")]
pub struct ApiError {
    /// Service-level status string, e.g. `"ERROR"`.
    pub status_code: String,
    pub message: String,
    pub code: i64,
}

/// Failures raised by the HTTP collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or broke mid-exchange.
    #[error("transport failure: {0}")]
    Connection(String),

    /// The collaborator completed without producing a response.
    #[error("transport returned no response")]
    NoResponse,
}
