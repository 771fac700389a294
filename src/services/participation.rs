//! Proof-of-participation facade.
//!
//! The organization account is threaded explicitly through every recording
//! call; nothing about the caller is remembered between calls.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::client::{envelope, CallOptions, ContractClient, Signer};
use crate::config::{AdapterConfig, PagingConfig};
use crate::error::{AdapterError, AdapterResult};
use crate::resolve::OperationBinding;
use crate::services::{call_view, pick_signer, read_paged, submit_write, WriteResult};
use crate::validate;

const INITIALIZE: &[&str] = &["initialize"];
const REGISTER: &[&str] = &["register_participation", "record_participation"];
const VERIFY: &[&str] = &["verify_participation"];
const BY_VOLUNTEER: &[&str] = &["get_volunteer_participations"];
const BY_TASK: &[&str] = &["get_task_volunteers"];
const DETAILS: &[&str] = &["get_participation_details"];

/// A participation certificate as stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub metadata: Option<String>,
    pub organization: String,
    pub task_id: String,
    pub task_name: String,
    pub timestamp: u64,
    pub volunteer: String,
}

/// Typed service over the participation proof contract.
pub struct ParticipationService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    paging: PagingConfig,
    initialize: OperationBinding,
    register: OperationBinding,
    verify: OperationBinding,
    by_volunteer: OperationBinding,
    by_task: OperationBinding,
    details: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl ParticipationService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            register: OperationBinding::negotiate(client.as_ref(), REGISTER),
            verify: OperationBinding::negotiate(client.as_ref(), VERIFY),
            by_volunteer: OperationBinding::negotiate(client.as_ref(), BY_VOLUNTEER),
            by_task: OperationBinding::negotiate(client.as_ref(), BY_TASK),
            details: OperationBinding::negotiate(client.as_ref(), DETAILS),
            options: config.call_options(),
            paging: config.paging.clone(),
            default_signer: None,
            client,
        }
    }

    pub fn with_default_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.default_signer = Some(signer);
        self
    }

    pub async fn initialize(
        &self,
        admin: &str,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(admin, "admin")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        submit_write(
            self.client.as_ref(),
            self.initialize.name()?,
            json!({ "admin": admin }),
            signer,
            &self.options,
        )
        .await
    }

    /// Record that `volunteer` participated in `event_id`, attested by
    /// `organization`.
    pub async fn record_participation(
        &self,
        organization: &str,
        volunteer: &str,
        event_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(organization, "organization")?;
        validate::assert_address(volunteer, "volunteer")?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let task_id = event_id.to_string();
        let args = json!({
            "organization": organization,
            "volunteer": volunteer,
            "task_id": task_id,
            "task_name": format!("Event {task_id}"),
            "metadata": { "tag": "none" },
        });
        submit_write(
            self.client.as_ref(),
            self.register.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    /// Whether the volunteer has a record for the event.
    pub async fn verify_participation(&self, volunteer: &str, event_id: u64) -> AdapterResult<bool> {
        validate::assert_address(volunteer, "volunteer")?;
        let value = call_view(
            self.client.as_ref(),
            self.verify.name()?,
            json!({ "volunteer": volunteer, "task_id": event_id.to_string() }),
            &self.options,
        )
        .await?;
        Ok(envelope::truthy(&value))
    }

    /// Number of events the volunteer participated in.
    pub async fn participation_count(&self, volunteer: &str) -> AdapterResult<u64> {
        validate::assert_address(volunteer, "volunteer")?;
        let items = read_paged(
            &self.client,
            self.by_volunteer.name()?,
            json!({ "volunteer": volunteer }),
            &self.paging,
            &self.options,
            "participations",
        )
        .await?;
        Ok(items.len() as u64)
    }

    /// Every volunteer recorded for one event, in listing order.
    pub async fn event_participants(&self, event_id: u64) -> AdapterResult<Vec<String>> {
        let items = read_paged(
            &self.client,
            self.by_task.name()?,
            json!({ "task_id": event_id.to_string() }),
            &self.paging,
            &self.options,
            "event participants",
        )
        .await?;
        items
            .iter()
            .map(|item| {
                envelope::as_string(item)
                    .or_else(|| envelope::field(item, &["volunteer"]).and_then(envelope::as_string))
                    .ok_or_else(|| AdapterError::ResponseShape(format!("participant: {item}")))
            })
            .collect()
    }

    /// Recording doubles as certificate issuance on this contract.
    pub async fn issue_certificate(
        &self,
        organization: &str,
        volunteer: &str,
        event_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        self.record_participation(organization, volunteer, event_id, signer)
            .await
    }

    /// Certificate details, or `None` when no record exists.
    pub async fn get_certificate(
        &self,
        volunteer: &str,
        event_id: u64,
    ) -> AdapterResult<Option<Certificate>> {
        validate::assert_address(volunteer, "volunteer")?;
        let value = call_view(
            self.client.as_ref(),
            self.details.name()?,
            json!({ "volunteer": volunteer, "task_id": event_id.to_string() }),
            &self.options,
        )
        .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(decode_certificate(&value)?))
    }
}

fn decode_certificate(value: &Value) -> AdapterResult<Certificate> {
    if !value.is_object() {
        return Err(AdapterError::ResponseShape(format!("certificate: {value}")));
    }
    // Metadata is an optional field that may itself arrive option-tagged.
    let metadata = envelope::field(value, &["metadata"])
        .cloned()
        .and_then(|raw| envelope::unwrap(raw).ok())
        .and_then(|inner| envelope::as_string(&inner));
    Ok(Certificate {
        metadata,
        organization: envelope::string_field(value, &["organization"]),
        task_id: envelope::string_field(value, &["task_id"]),
        task_name: envelope::string_field(value, &["task_name"]),
        timestamp: envelope::u64_field(value, &["timestamp"]).unwrap_or(0),
        volunteer: envelope::string_field(value, &["volunteer"]),
    })
}
