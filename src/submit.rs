//! Two-path commit protocol.
//!
//! # Data Flow
//! ```text
//! prepared operation
//!     → path A: delegated sign-and-send on the prepared call
//!               → tolerant hash extraction
//!     → path B: re-prepare in build mode
//!               → tolerant payload extraction
//!               → external signer signs, submits, returns the hash
//! ```
//!
//! Path A is attempted first; any failure falls back to path B. Exactly one
//! mutation is attempted per call and nothing is retried: on-chain mutations
//! are not safely idempotent without caller-managed idempotency keys, which
//! this layer does not provide.

use serde_json::Value;

use crate::client::{extract, CallMode, CallOptions, ClientError, ContractClient, Signer};
use crate::error::{AdapterError, AdapterResult};

/// Commit one prepared operation and return its transaction hash.
///
/// Fails with `Submission`, wrapping the underlying cause and the original
/// call arguments, when both paths fail or no hash can be extracted.
pub async fn submit(
    client: &dyn ContractClient,
    operation: &str,
    args: &Value,
    signer: &dyn Signer,
    options: &CallOptions,
) -> AdapterResult<String> {
    match delegated(client, operation, args, signer, options).await {
        Ok(hash) => return Ok(hash),
        Err(err) => {
            tracing::debug!(operation, error = %err, "delegated sign-and-send failed, using manual signing path");
        }
    }

    manual(client, operation, args, signer, options)
        .await
        .map_err(|source| AdapterError::Submission {
            operation: operation.to_string(),
            args: args.to_string(),
            source,
        })
}

/// Path A: the prepared call signs and sends through the signer itself.
async fn delegated(
    client: &dyn ContractClient,
    operation: &str,
    args: &Value,
    signer: &dyn Signer,
    options: &CallOptions,
) -> Result<String, ClientError> {
    let prepared = client
        .prepare(operation, args.clone(), &options.with_mode(CallMode::Execute))
        .await?;
    let response = prepared.sign_and_send(signer).await?;
    extract::tx_hash(&response).ok_or_else(|| {
        ClientError::Execution("no transaction hash in sign-and-send response".to_string())
    })
}

/// Path B: extract a serialized unsigned payload and delegate to the signer.
async fn manual(
    client: &dyn ContractClient,
    operation: &str,
    args: &Value,
    signer: &dyn Signer,
    options: &CallOptions,
) -> Result<String, ClientError> {
    let prepared = client
        .prepare(operation, args.clone(), &options.with_mode(CallMode::Build))
        .await?;
    let built = prepared.payload().await?;
    let payload = extract::payload(&built).ok_or_else(|| {
        ClientError::Execution("no unsigned payload in build response".to_string())
    })?;
    signer.send(&payload).await
}
