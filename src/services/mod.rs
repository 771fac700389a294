//! Per-domain service facades.
//!
//! # Data Flow
//! ```text
//! caller (typed arguments)
//!     → validate / time normalization (fail fast, no round trip)
//!     → negotiated operation bindings (resolve.rs, at construction)
//!     → writes: optional preview (simulate.rs) → commit (submit.rs)
//!     → reads: view call or paginated read → envelope normalization
//!     → typed result
//! ```
//!
//! # Design Decisions
//! - Facades hold no durable state and never cache; every call re-queries
//!   the remote system
//! - The default signer is captured at construction and immutable; write
//!   methods also accept an explicit signer which takes precedence
//! - Read failures propagate as typed errors; callers decide any fallback

pub mod collectibles;
pub mod goals;
pub mod governance;
pub mod participation;
pub mod projects;
pub mod recognition;
pub mod scheduling;

pub use collectibles::{CollectibleService, MintResult, Token};
pub use goals::{CreateGoalResult, Goal, GoalKind, GoalService, GoalStatus};
pub use governance::{CreateProposalResult, GovernanceService, Proposal, VoteRecord};
pub use participation::{Certificate, ParticipationService};
pub use projects::{CreateProjectResult, Milestone, ProjectInfo, ProjectService};
pub use recognition::{GiveRecognitionResult, RecognitionRecord, RecognitionService};
pub use scheduling::{AvailabilitySlot, DayAvailability, SchedulingService};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{envelope, CallOptions, ClientError, ContractClient, Signer};
use crate::config::PagingConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::{paginate, submit};

/// Outcome of a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    /// Hash of the submitted transaction.
    pub tx_hash: String,
    /// Always true on the success path; kept for callers that match on it.
    pub success: bool,
}

/// Explicit signer, else the construction-time default, else `SignerRequired`.
pub(crate) fn pick_signer<'a>(
    explicit: Option<&'a dyn Signer>,
    default: &'a Option<Arc<dyn Signer>>,
) -> AdapterResult<&'a dyn Signer> {
    explicit
        .or_else(|| default.as_deref())
        .ok_or(AdapterError::SignerRequired)
}

/// Commit a write and wrap the hash.
pub(crate) async fn submit_write(
    client: &dyn ContractClient,
    operation: &str,
    args: Value,
    signer: &dyn Signer,
    options: &CallOptions,
) -> AdapterResult<WriteResult> {
    let tx_hash = submit::submit(client, operation, &args, signer, options).await?;
    Ok(WriteResult {
        tx_hash,
        success: true,
    })
}

/// Execute a view operation and normalize its envelope.
///
/// Prefers the prepared call's own preview; falls back to the client-level
/// preview entry point when that capability is absent.
pub(crate) async fn call_view(
    client: &dyn ContractClient,
    operation: &str,
    args: Value,
    options: &CallOptions,
) -> AdapterResult<Value> {
    let prepared = match client.prepare(operation, args.clone(), options).await {
        Ok(prepared) => prepared,
        Err(ClientError::Unsupported(_)) => {
            return Ok(envelope::unwrap(client.simulate(operation, args).await?)?);
        }
        Err(err) => return Err(err.into()),
    };
    match prepared.simulate().await {
        Ok(raw) => Ok(envelope::unwrap(raw)?),
        Err(ClientError::Unsupported(_)) => {
            Ok(envelope::unwrap(client.simulate(operation, args).await?)?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Treat a normalized view result as a list of items.
pub(crate) fn expect_items(value: Value, what: &str) -> AdapterResult<Vec<Value>> {
    envelope::into_items(value)
        .ok_or_else(|| AdapterError::ResponseShape(format!("{what}: expected a list")))
}

/// Paginated listing read: inject offset/limit into `base_args` and
/// accumulate until the short-page exhaustion signal.
pub(crate) async fn read_paged(
    client: &Arc<dyn ContractClient>,
    operation: &str,
    base_args: Value,
    paging: &PagingConfig,
    options: &CallOptions,
    what: &str,
) -> AdapterResult<Vec<Value>> {
    let limit = paging.limit;
    paginate::read_all(limit, paging.max_pages, |offset| {
        let client = Arc::clone(client);
        let operation = operation.to_string();
        let mut args = base_args.clone();
        let options = options.clone();
        let what = what.to_string();
        async move {
            if let Value::Object(map) = &mut args {
                map.insert("offset".to_string(), offset.into());
                map.insert("limit".to_string(), limit.into());
            }
            let value = call_view(client.as_ref(), &operation, args, &options).await?;
            expect_items(value, &what)
        }
    })
    .await
}
