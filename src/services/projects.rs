//! Volunteer project facade.
//!
//! The project surface drifted the most across deployments: older contracts
//! expose a bounty-flavored interface (`create_bounty`, `withdraw_reward`,
//! token `transfer`) instead of the project one. Negotiation picks the
//! variant once, and argument shapes follow the selected name.

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
const CREATE_PROJECT: &[&str] = &["create_project", "create_bounty"];
const JOIN_PROJECT: &[&str] = &["join_project"];
const CONTRIBUTE: &[&str] = &["contribute_resources", "transfer"];
const MARK_MILESTONE: &[&str] = &["mark_milestone"];
const FINALIZE: &[&str] = &["finalize_project", "withdraw_reward"];
const GET_PROJECT: &[&str] = &["get_project", "get_bounty"];
const GET_VOLUNTEERS: &[&str] = &["get_volunteers"];
const GET_MILESTONES: &[&str] = &["get_milestones"];
const GET_PROJECT_STATUS: &[&str] = &["get_project_status"];

/// One project milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub id: Option<u32>,
    pub title: String,
    pub completed: bool,
}

/// A project as stored on-chain; optional fields tolerate binding drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub id: u32,
    pub organizer: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub volunteer_goal: Option<u64>,
    pub deadline: Option<u64>,
    pub status: Option<String>,
    pub milestones: Vec<Milestone>,
}

/// Result of creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectResult {
    /// Id previewed before the commit; `None` when no preview was available
    /// (the bounty variant returns a struct without one).
    pub id: Option<u32>,
    pub tx_hash: String,
}

/// Typed service over the volunteer project contract.
pub struct ProjectService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    initialize: OperationBinding,
    create_project: OperationBinding,
    join_project: OperationBinding,
    contribute: OperationBinding,
    mark_milestone: OperationBinding,
    finalize: OperationBinding,
    get_project: OperationBinding,
    get_volunteers: OperationBinding,
    get_milestones: OperationBinding,
    get_project_status: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl ProjectService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            create_project: OperationBinding::negotiate(client.as_ref(), CREATE_PROJECT),
            join_project: OperationBinding::negotiate(client.as_ref(), JOIN_PROJECT),
            contribute: OperationBinding::negotiate(client.as_ref(), CONTRIBUTE),
            mark_milestone: OperationBinding::negotiate(client.as_ref(), MARK_MILESTONE),
            finalize: OperationBinding::negotiate(client.as_ref(), FINALIZE),
            get_project: OperationBinding::negotiate(client.as_ref(), GET_PROJECT),
            get_volunteers: OperationBinding::negotiate(client.as_ref(), GET_VOLUNTEERS),
            get_milestones: OperationBinding::negotiate(client.as_ref(), GET_MILESTONES),
            get_project_status: OperationBinding::negotiate(client.as_ref(), GET_PROJECT_STATUS),
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

    /// Create a project, previewing the created id before the commit.
    pub async fn create_project(
        &self,
        organizer: &str,
        name: &str,
        description: &str,
        volunteer_goal: u64,
        deadline: TimeInput,
        milestones: &[String],
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<CreateProjectResult> {
        validate::assert_address(organizer, "organizer")?;
        validate::assert_non_empty(name, "name")?;
        validate::assert_non_empty(description, "description")?;
        if milestones.is_empty() {
            return Err(AdapterError::EmptyField {
                field: "milestones".to_string(),
            });
        }
        for (index, milestone) in milestones.iter().enumerate() {
            validate::assert_non_empty(milestone, &format!("milestones[{index}]"))?;
        }
        let deadline = time::normalize_to_seconds(&deadline)?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let operation = self.create_project.name()?;
        let args = if self.create_project.is("create_bounty") {
            bounty_args(organizer, name, description, volunteer_goal, milestones)
        } else {
            json!({
                "organizer": organizer,
                "name": name,
                "description": description,
                "volunteer_goal": volunteer_goal,
                "deadline": deadline,
                "milestones": milestones,
            })
        };

        let id = simulate::preview(self.client.as_ref(), operation, &args, &self.options)
            .await
            .as_ref()
            .and_then(envelope::as_u32);

        let written = submit_write(self.client.as_ref(), operation, args, signer, &self.options).await?;
        Ok(CreateProjectResult {
            id,
            tx_hash: written.tx_hash,
        })
    }

    pub async fn join_project(
        &self,
        volunteer: &str,
        project_id: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(volunteer, "volunteer")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "volunteer": volunteer, "project_id": project_id });
        submit_write(
            self.client.as_ref(),
            self.join_project.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    /// Contribute resources to a project. Token-flavored deployments only
    /// expose `transfer`, which moves the amount without a project tag.
    pub async fn contribute_resources(
        &self,
        volunteer: &str,
        project_id: u32,
        amount: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(volunteer, "volunteer")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = if self.contribute.is("transfer") {
            json!({ "from": volunteer, "to": volunteer, "amount": amount })
        } else {
            json!({ "volunteer": volunteer, "project_id": project_id, "amount": amount })
        };
        submit_write(
            self.client.as_ref(),
            self.contribute.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn mark_milestone(
        &self,
        organizer: &str,
        project_id: u32,
        milestone_id: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(organizer, "organizer")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({
            "organizer": organizer,
            "project_id": project_id,
            "milestone_id": milestone_id,
        });
        submit_write(
            self.client.as_ref(),
            self.mark_milestone.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn finalize_project(
        &self,
        organizer: &str,
        project_id: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(organizer, "organizer")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = if self.finalize.is("withdraw_reward") {
            json!({ "volunteer": organizer, "trustline": organizer })
        } else {
            json!({ "organizer": organizer, "project_id": project_id })
        };
        submit_write(
            self.client.as_ref(),
            self.finalize.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn get_project(&self, project_id: u32) -> AdapterResult<ProjectInfo> {
        // The bounty variant stores a single record and takes no id.
        let args = if self.get_project.is("get_bounty") {
            json!({})
        } else {
            json!({ "project_id": project_id })
        };
        let value = call_view(
            self.client.as_ref(),
            self.get_project.name()?,
            args,
            &self.options,
        )
        .await?;
        decode_project(project_id, &value)
    }

    pub async fn get_volunteers(&self, project_id: u32) -> AdapterResult<Vec<String>> {
        let value = call_view(
            self.client.as_ref(),
            self.get_volunteers.name()?,
            json!({ "project_id": project_id }),
            &self.options,
        )
        .await?;
        expect_items(value, "volunteers")?
            .iter()
            .map(|item| {
                envelope::as_string(item)
                    .ok_or_else(|| AdapterError::ResponseShape(format!("volunteer: {item}")))
            })
            .collect()
    }

    pub async fn get_milestones(&self, project_id: u32) -> AdapterResult<Vec<Milestone>> {
        let value = call_view(
            self.client.as_ref(),
            self.get_milestones.name()?,
            json!({ "project_id": project_id }),
            &self.options,
        )
        .await?;
        Ok(expect_items(value, "milestones")?
            .iter()
            .map(decode_milestone)
            .collect())
    }

    pub async fn get_project_status(&self, project_id: u32) -> AdapterResult<String> {
        let value = call_view(
            self.client.as_ref(),
            self.get_project_status.name()?,
            json!({ "project_id": project_id }),
            &self.options,
        )
        .await?;
        envelope::as_string(&value)
            .or_else(|| envelope::field(&value, &["tag", "status"]).and_then(envelope::as_string))
            .ok_or_else(|| AdapterError::ResponseShape(format!("project status: {value}")))
    }
}

fn bounty_args(
    organizer: &str,
    name: &str,
    description: &str,
    amount: u64,
    milestones: &[String],
) -> Value {
    let tasks: Vec<Value> = milestones
        .iter()
        .map(|title| {
            json!({
                "description": title,
                "difficulty": { "tag": "Medium" },
                "status": "Pending",
                "completed": false,
            })
        })
        .collect();
    json!({
        "bounty_properties": {
            "owner": organizer,
            "title": name,
            "description": description,
            "amount": amount,
            "volunteer": organizer,
            "tasks": tasks,
        }
    })
}

fn decode_project(requested_id: u32, value: &Value) -> AdapterResult<ProjectInfo> {
    if !value.is_object() {
        return Err(AdapterError::ResponseShape(format!("project: {value}")));
    }
    let milestones = envelope::field(value, &["milestones", "tasks"])
        .and_then(Value::as_array)
        .map(|items| items.iter().map(decode_milestone).collect())
        .unwrap_or_default();
    Ok(ProjectInfo {
        id: envelope::u32_field(value, &["id", "project_id"]).unwrap_or(requested_id),
        organizer: envelope::field(value, &["organizer", "owner"]).and_then(envelope::as_string),
        name: envelope::field(value, &["name", "title"]).and_then(envelope::as_string),
        description: envelope::field(value, &["description"]).and_then(envelope::as_string),
        volunteer_goal: envelope::u64_field(value, &["volunteer_goal", "amount"]),
        deadline: envelope::u64_field(value, &["deadline"]),
        status: envelope::field(value, &["status"]).and_then(envelope::as_string),
        milestones,
    })
}

fn decode_milestone(value: &Value) -> Milestone {
    Milestone {
        id: envelope::u32_field(value, &["id", "milestone_id"]),
        title: envelope::string_field(value, &["title", "description"]),
        completed: envelope::bool_field(value, &["completed"]),
    }
}
