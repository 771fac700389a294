//! Remote contract client capability surface.
//!
//! # Data Flow
//! ```text
//! facade (typed args)
//!     → ContractClient::prepare (one prepared call per remote operation)
//!     → PreparedCall::{simulate, sign_and_send, payload}
//!     → envelope.rs (response-shape normalization)
//!     → extract.rs (tolerant hash / payload lookup)
//! ```
//!
//! # Design Decisions
//! - Generated bindings differ per contract version; the core depends only on
//!   this minimal surface and every capability defaults to `Unsupported` so a
//!   missing one degrades instead of failing construction
//! - Arguments and responses cross the surface as `serde_json::Value`, the
//!   lingua franca of the loosely-specified bindings

pub mod envelope;
pub mod extract;
pub mod signer;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use signer::Signer;

/// Errors produced by the collaborator surface (bindings, transport, signer).
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The binding does not expose this capability.
    #[error("capability not supported: {0}")]
    Unsupported(&'static str),

    /// Network or RPC-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote system executed the call and rejected it.
    #[error("execution failed: {0}")]
    Execution(String),

    /// The external signer refused or failed to sign.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// How a prepared call should be materialized by the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallMode {
    /// Normal assembly for execution.
    #[default]
    Execute,
    /// Read-only preview; no state change may result.
    Preview,
    /// Yield a serialized unsigned payload instead of executing.
    Build,
}

/// Advisory options forwarded to the remote-call layer.
///
/// Timeouts are not enforced here; a stalled remote call stalls the caller.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Fee bid in the chain's smallest unit.
    pub fee: Option<u64>,
    /// Advisory transaction timeout.
    pub timeout_secs: Option<u64>,
    /// Materialization mode.
    pub mode: CallMode,
}

impl CallOptions {
    /// Copy of these options with a different materialization mode.
    pub fn with_mode(&self, mode: CallMode) -> Self {
        Self { mode, ..self.clone() }
    }
}

/// One not-yet-executed remote call.
///
/// Single-use: scoped to one facade call, never retried or reused.
#[async_trait]
pub trait PreparedCall: Send + Sync {
    /// Read-only preview against current remote state.
    async fn simulate(&self) -> Result<Value, ClientError> {
        Err(ClientError::Unsupported("prepared-call preview"))
    }

    /// Delegated sign-and-send through an external signer.
    async fn sign_and_send(&self, signer: &dyn Signer) -> Result<Value, ClientError> {
        let _ = signer;
        Err(ClientError::Unsupported("delegated sign-and-send"))
    }

    /// Serialized unsigned payload, meaningful when prepared with
    /// [`CallMode::Build`].
    async fn payload(&self) -> Result<Value, ClientError> {
        Err(ClientError::Unsupported("unsigned payload extraction"))
    }
}

/// A bound remote contract client: one operation name per contract function.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Operation names exposed by the bound deployment.
    fn operations(&self) -> Vec<String>;

    /// Whether `name` is part of the exposed operation set.
    fn has_operation(&self, name: &str) -> bool {
        self.operations().iter().any(|op| op == name)
    }

    /// Prepare one remote call without executing it.
    async fn prepare(
        &self,
        operation: &str,
        args: Value,
        options: &CallOptions,
    ) -> Result<Box<dyn PreparedCall>, ClientError>;

    /// Client-level preview entry point, for bindings whose prepared calls
    /// cannot simulate themselves.
    async fn simulate(&self, operation: &str, args: Value) -> Result<Value, ClientError> {
        let _ = (operation, args);
        Err(ClientError::Unsupported("client-level preview"))
    }
}
