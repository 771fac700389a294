//! Adapter-wide error taxonomy.
//!
//! Local validation failures never reach the remote system; remote failures
//! carry enough context (operation name, call arguments) to diagnose them at
//! the boundary without replaying the call.

use thiserror::Error;

use crate::client::ClientError;

/// Errors surfaced by the adapter layer.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A time string could not be parsed as a date.
    #[error("invalid time string: {0}")]
    InvalidTimeFormat(String),

    /// A time input arrived in a shape that carries no instant.
    #[error("unsupported time input: {0}")]
    UnsupportedTimeType(&'static str),

    /// An interval whose end does not lie strictly after its start.
    #[error("invalid interval: end {end} must be greater than start {start}")]
    InvalidInterval { start: u64, end: u64 },

    /// An account identifier that is empty or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidAddress { field: String, reason: String },

    /// A required text field that is empty or whitespace-only.
    #[error("{field} must not be empty")]
    EmptyField { field: String },

    /// An integer outside the target width, negative, or fractional.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: String },

    /// None of the candidate operation names exist on the bound client.
    #[error("no matching contract operation; tried: {}", .tried.join(", "))]
    MethodNotFound { tried: Vec<String> },

    /// A write was attempted without an explicit or default signer.
    #[error("signer is required for write operations")]
    SignerRequired,

    /// The bound contract cannot express this operation at all.
    #[error("{0} is not supported by the bound contract")]
    Unsupported(&'static str),

    /// Both commit paths failed, or no transaction hash could be extracted.
    #[error("submission of {operation} failed (args: {args}): {source}")]
    Submission {
        operation: String,
        /// JSON-encoded original call arguments, kept for diagnosis.
        args: String,
        #[source]
        source: ClientError,
    },

    /// A paginated read kept returning full pages past the configured cap.
    #[error("pagination exceeded {max_pages} pages")]
    TooManyPages { max_pages: u32 },

    /// A remote or signing failure propagated from the client surface.
    #[error("contract client error: {0}")]
    Client(#[from] ClientError),

    /// A remote response arrived in a shape the facade cannot normalize.
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),
}

impl AdapterError {
    /// True for failures produced locally, before any remote round trip.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AdapterError::InvalidTimeFormat(_)
                | AdapterError::UnsupportedTimeType(_)
                | AdapterError::InvalidInterval { .. }
                | AdapterError::InvalidAddress { .. }
                | AdapterError::EmptyField { .. }
                | AdapterError::OutOfRange { .. }
        )
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
