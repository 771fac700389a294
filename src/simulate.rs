//! Best-effort preview of a not-yet-committed operation.
//!
//! Previews recover values the remote system only computes at execution time
//! (a created id, say) so callers can show optimistic feedback before the
//! commit confirms. Absence of a preview is not an error: the result is
//! `Option<Value>`, and each failed attempt is logged here, at the boundary
//! that absorbs it, so no structured detail disappears silently.

use serde_json::Value;

use crate::client::{envelope, CallMode, CallOptions, ContractClient};

/// Try the preview capabilities in order and return the first structured
/// result, already envelope-normalized. Never fails.
///
/// Order: prepared-call preview, preview-mode re-preparation, client-level
/// preview entry point.
pub async fn preview(
    client: &dyn ContractClient,
    operation: &str,
    args: &Value,
    options: &CallOptions,
) -> Option<Value> {
    match prepared_preview(client, operation, args, options).await {
        Ok(value) => return Some(value),
        Err(err) => {
            tracing::debug!(operation, error = %err, "prepared-call preview unavailable");
        }
    }

    let preview_options = options.with_mode(CallMode::Preview);
    match prepared_preview(client, operation, args, &preview_options).await {
        Ok(value) => return Some(value),
        Err(err) => {
            tracing::debug!(operation, error = %err, "preview-mode preparation unavailable");
        }
    }

    match client.simulate(operation, args.clone()).await {
        Ok(value) => match envelope::unwrap(value) {
            Ok(inner) => return Some(inner),
            Err(err) => {
                tracing::debug!(operation, error = %err, "client-level preview returned an error envelope");
            }
        },
        Err(err) => {
            tracing::debug!(operation, error = %err, "client-level preview unavailable");
        }
    }

    None
}

async fn prepared_preview(
    client: &dyn ContractClient,
    operation: &str,
    args: &Value,
    options: &CallOptions,
) -> Result<Value, crate::client::ClientError> {
    let prepared = client.prepare(operation, args.clone(), options).await?;
    let raw = prepared.simulate().await?;
    envelope::unwrap(raw)
}
