//! Remote operation name resolution.
//!
//! The binding surface drifts across contract versions and deployments: the
//! same logical operation may be exposed under different names (or shapes).
//! Facades degrade by trying known aliases rather than hard-failing on a
//! single name mismatch. Resolution happens once, at facade construction,
//! and the selected variant is recorded so argument shapes can follow it.

use crate::client::ContractClient;
use crate::error::{AdapterError, AdapterResult};

/// First candidate name present on the client's exposed operation set.
pub fn resolve_operation<'a>(
    client: &dyn ContractClient,
    candidates: &'a [&'a str],
) -> AdapterResult<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|name| client.has_operation(name))
        .ok_or_else(|| AdapterError::MethodNotFound {
            tried: candidates.iter().map(|name| name.to_string()).collect(),
        })
}

/// One logical remote operation, bound to a concrete name at construction.
///
/// A binding that failed to negotiate stays constructible; it reports
/// `MethodNotFound` (with the full tried list) when first invoked, so a
/// facade over a partial deployment still serves the operations that exist.
#[derive(Debug, Clone)]
pub struct OperationBinding {
    candidates: &'static [&'static str],
    resolved: Option<&'static str>,
}

impl OperationBinding {
    /// Negotiate against the client's exposed operation set.
    pub fn negotiate(client: &dyn ContractClient, candidates: &'static [&'static str]) -> Self {
        let resolved = candidates
            .iter()
            .copied()
            .find(|name| client.has_operation(name));
        if resolved.is_none() {
            tracing::debug!(tried = ?candidates, "bound contract exposes none of the candidate operations");
        }
        Self { candidates, resolved }
    }

    /// The negotiated concrete name.
    pub fn name(&self) -> AdapterResult<&'static str> {
        self.resolved.ok_or_else(|| AdapterError::MethodNotFound {
            tried: self.candidates.iter().map(|name| name.to_string()).collect(),
        })
    }

    /// Whether negotiation selected `name`; used to pick the matching
    /// argument shape for legacy variants.
    pub fn is(&self, name: &str) -> bool {
        self.resolved == Some(name)
    }

    /// Whether any candidate resolved.
    pub fn is_bound(&self) -> bool {
        self.resolved.is_some()
    }
}
