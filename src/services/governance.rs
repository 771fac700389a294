//! Proposal governance facade.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::client::{envelope, CallOptions, ContractClient, Signer};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::resolve::OperationBinding;
use crate::services::{call_view, expect_items, pick_signer, submit_write, WriteResult};
use crate::simulate;
use crate::time::{self, TimeInput};
use crate::validate;

const INITIALIZE: &[&str] = &["initialize"];
const CREATE_PROPOSAL: &[&str] = &["create_proposal"];
const VOTE: &[&str] = &["vote", "cast_vote"];
const CLOSE_PROPOSAL: &[&str] = &["close_proposal"];
const GET_PROPOSAL: &[&str] = &["get_proposal"];
const GET_VOTES: &[&str] = &["get_votes"];
const GET_USER_VOTES: &[&str] = &["get_user_votes"];
const GET_PROPOSAL_STATUS: &[&str] = &["get_proposal_status"];

/// A proposal as stored on-chain; optional fields tolerate older bindings
/// that omit them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: u32,
    pub creator: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub options: Vec<String>,
    pub deadline: Option<u64>,
    pub status: Option<String>,
}

/// One cast vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub voter: Option<String>,
    pub proposal_id: Option<u32>,
    pub option_id: Option<u32>,
}

/// Result of creating a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProposalResult {
    /// Id previewed before the commit; `None` when no preview was available.
    pub id: Option<u32>,
    pub tx_hash: String,
    pub success: bool,
}

/// Typed service over the governance contract.
pub struct GovernanceService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    initialize: OperationBinding,
    create_proposal: OperationBinding,
    vote: OperationBinding,
    close_proposal: OperationBinding,
    get_proposal: OperationBinding,
    get_votes: OperationBinding,
    get_user_votes: OperationBinding,
    get_proposal_status: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl GovernanceService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            create_proposal: OperationBinding::negotiate(client.as_ref(), CREATE_PROPOSAL),
            vote: OperationBinding::negotiate(client.as_ref(), VOTE),
            close_proposal: OperationBinding::negotiate(client.as_ref(), CLOSE_PROPOSAL),
            get_proposal: OperationBinding::negotiate(client.as_ref(), GET_PROPOSAL),
            get_votes: OperationBinding::negotiate(client.as_ref(), GET_VOTES),
            get_user_votes: OperationBinding::negotiate(client.as_ref(), GET_USER_VOTES),
            get_proposal_status: OperationBinding::negotiate(client.as_ref(), GET_PROPOSAL_STATUS),
            options: config.call_options(),
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

    /// Create a proposal, previewing the created id before the commit.
    ///
    /// At least two non-empty voting options are required.
    pub async fn create_proposal(
        &self,
        creator: &str,
        title: &str,
        description: &str,
        voting_options: &[String],
        deadline: TimeInput,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<CreateProposalResult> {
        validate::assert_address(creator, "creator")?;
        validate::assert_non_empty(title, "title")?;
        validate::assert_non_empty(description, "description")?;
        if voting_options.len() < 2 {
            return Err(AdapterError::OutOfRange {
                field: "options".to_string(),
                value: voting_options.len().to_string(),
            });
        }
        for (index, option) in voting_options.iter().enumerate() {
            validate::assert_non_empty(option, &format!("options[{index}]"))?;
        }
        let deadline = time::normalize_to_seconds(&deadline)?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let operation = self.create_proposal.name()?;
        let args = json!({
            "creator": creator,
            "title": title,
            "description": description,
            "options": voting_options,
            "deadline": deadline,
        });

        let id = simulate::preview(self.client.as_ref(), operation, &args, &self.options)
            .await
            .as_ref()
            .and_then(envelope::as_u32);

        let written = submit_write(self.client.as_ref(), operation, args, signer, &self.options).await?;
        Ok(CreateProposalResult {
            id,
            tx_hash: written.tx_hash,
            success: written.success,
        })
    }

    pub async fn vote(
        &self,
        voter: &str,
        proposal_id: u32,
        option_id: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(voter, "voter")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({
            "voter": voter,
            "proposal_id": proposal_id,
            "option_id": option_id,
        });
        submit_write(
            self.client.as_ref(),
            self.vote.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn close_proposal(
        &self,
        caller: &str,
        proposal_id: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(caller, "caller")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "caller": caller, "proposal_id": proposal_id });
        submit_write(
            self.client.as_ref(),
            self.close_proposal.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn get_proposal(&self, proposal_id: u32) -> AdapterResult<Proposal> {
        let value = call_view(
            self.client.as_ref(),
            self.get_proposal.name()?,
            json!({ "proposal_id": proposal_id }),
            &self.options,
        )
        .await?;
        decode_proposal(proposal_id, &value)
    }

    /// All votes cast on one proposal.
    pub async fn get_votes(&self, proposal_id: u32) -> AdapterResult<Vec<VoteRecord>> {
        let value = call_view(
            self.client.as_ref(),
            self.get_votes.name()?,
            json!({ "proposal_id": proposal_id }),
            &self.options,
        )
        .await?;
        Ok(expect_items(value, "votes")?
            .iter()
            .map(decode_vote)
            .collect())
    }

    /// All votes one account has cast.
    pub async fn get_user_votes(&self, user: &str) -> AdapterResult<Vec<VoteRecord>> {
        validate::assert_address(user, "user")?;
        let value = call_view(
            self.client.as_ref(),
            self.get_user_votes.name()?,
            json!({ "user": user }),
            &self.options,
        )
        .await?;
        Ok(expect_items(value, "user votes")?
            .iter()
            .map(decode_vote)
            .collect())
    }

    /// Raw status tag as the contract reports it.
    pub async fn get_proposal_status(&self, proposal_id: u32) -> AdapterResult<String> {
        let value = call_view(
            self.client.as_ref(),
            self.get_proposal_status.name()?,
            json!({ "proposal_id": proposal_id }),
            &self.options,
        )
        .await?;
        envelope::as_string(&value)
            .or_else(|| envelope::field(&value, &["tag", "status"]).and_then(envelope::as_string))
            .ok_or_else(|| AdapterError::ResponseShape(format!("proposal status: {value}")))
    }
}

fn decode_proposal(requested_id: u32, value: &Value) -> AdapterResult<Proposal> {
    if !value.is_object() {
        return Err(AdapterError::ResponseShape(format!("proposal: {value}")));
    }
    let options = envelope::field(value, &["options", "choices"])
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(envelope::as_string).collect())
        .unwrap_or_default();
    Ok(Proposal {
        id: envelope::u32_field(value, &["id", "proposal_id"]).unwrap_or(requested_id),
        creator: envelope::field(value, &["creator"]).and_then(envelope::as_string),
        title: envelope::field(value, &["title"]).and_then(envelope::as_string),
        description: envelope::field(value, &["description"]).and_then(envelope::as_string),
        options,
        deadline: envelope::u64_field(value, &["deadline"]),
        status: envelope::field(value, &["status"]).and_then(envelope::as_string),
    })
}

fn decode_vote(value: &Value) -> VoteRecord {
    VoteRecord {
        voter: envelope::field(value, &["voter", "user"]).and_then(envelope::as_string),
        proposal_id: envelope::u32_field(value, &["proposal_id"]),
        option_id: envelope::u32_field(value, &["option_id", "option"]),
    }
}
