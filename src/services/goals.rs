//! Goal tracking facade.

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
const CREATE_GOAL: &[&str] = &["create_goal"];
const UPDATE_PROGRESS: &[&str] = &["update_progress", "update_goal"];
const GET_GOAL: &[&str] = &["get_goal"];
const GET_GOALS_BY_USER: &[&str] = &["get_goals_by_user", "get_user_goals"];

/// What a goal counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalKind {
    TasksCompleted,
    HoursVolunteered,
    ResourcesContributed,
    /// A kind this build does not know; carried through untouched.
    Other(String),
}

impl GoalKind {
    fn tag(&self) -> &str {
        match self {
            GoalKind::TasksCompleted => "TasksCompleted",
            GoalKind::HoursVolunteered => "HoursVolunteered",
            GoalKind::ResourcesContributed => "ResourcesContributed",
            GoalKind::Other(tag) => tag,
        }
    }

    /// Decode from a bare tag string or a tagged-enum object.
    fn from_value(value: &Value) -> Self {
        let tag = envelope::as_string(value)
            .or_else(|| envelope::field(value, &["tag"]).and_then(envelope::as_string))
            .unwrap_or_default();
        match tag.as_str() {
            "TasksCompleted" => GoalKind::TasksCompleted,
            "HoursVolunteered" => GoalKind::HoursVolunteered,
            "ResourcesContributed" => GoalKind::ResourcesContributed,
            other => GoalKind::Other(other.to_string()),
        }
    }
}

/// A goal as stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: u64,
    pub volunteer: String,
    pub kind: GoalKind,
    pub target_amount: u64,
    pub current_amount: u64,
    pub completed: bool,
}

/// Coarse progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Pending,
    Completed,
}

/// Result of creating a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGoalResult {
    /// Id previewed before the commit; `None` when no preview was available.
    pub id: Option<u64>,
    pub tx_hash: String,
}

/// Typed service over the goal tracking contract.
pub struct GoalService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    initialize: OperationBinding,
    create_goal: OperationBinding,
    update_progress: OperationBinding,
    get_goal: OperationBinding,
    get_goals_by_user: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl GoalService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            create_goal: OperationBinding::negotiate(client.as_ref(), CREATE_GOAL),
            update_progress: OperationBinding::negotiate(client.as_ref(), UPDATE_PROGRESS),
            get_goal: OperationBinding::negotiate(client.as_ref(), GET_GOAL),
            get_goals_by_user: OperationBinding::negotiate(client.as_ref(), GET_GOALS_BY_USER),
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
        // The contract wants an updater account as well; the admin serves
        // both roles here.
        let args = json!({ "admin": admin, "updater": admin });
        submit_write(
            self.client.as_ref(),
            self.initialize.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    /// Create a goal, previewing the created id before the commit.
    ///
    /// Title, description, and deadline are validated for callers' sake but
    /// not transmitted; the current contract does not store them.
    pub async fn create_goal(
        &self,
        user: &str,
        title: &str,
        description: &str,
        kind: GoalKind,
        target: u64,
        deadline: TimeInput,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<CreateGoalResult> {
        validate::assert_address(user, "user")?;
        validate::assert_non_empty(title, "title")?;
        validate::assert_non_empty(description, "description")?;
        time::normalize_to_seconds(&deadline)?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let operation = self.create_goal.name()?;
        let args = json!({
            "volunteer": user,
            "goal_type": kind.tag(),
            "target_amount": target,
        });

        let id = simulate::preview(self.client.as_ref(), operation, &args, &self.options)
            .await
            .as_ref()
            .and_then(envelope::as_u64);

        let written = submit_write(self.client.as_ref(), operation, args, signer, &self.options).await?;
        Ok(CreateGoalResult {
            id,
            tx_hash: written.tx_hash,
        })
    }

    /// Add progress toward a goal.
    pub async fn update_progress(
        &self,
        user: &str,
        goal_id: u64,
        amount: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(user, "user")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "goal_id": goal_id, "amount_to_add": amount });
        submit_write(
            self.client.as_ref(),
            self.update_progress.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    /// Complete a goal by submitting the remaining amount.
    ///
    /// Returns `None` when the goal is already complete; nothing is
    /// submitted in that case.
    pub async fn complete_goal(
        &self,
        user: &str,
        goal_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<Option<WriteResult>> {
        validate::assert_address(user, "user")?;
        let goal = self.get_goal(goal_id).await?;
        if goal.completed || goal.current_amount >= goal.target_amount {
            return Ok(None);
        }
        let remaining = goal.target_amount - goal.current_amount;
        self.update_progress(user, goal_id, remaining, signer)
            .await
            .map(Some)
    }

    /// The current contract has no delete operation.
    pub async fn delete_goal(
        &self,
        _user: &str,
        _goal_id: u64,
        _signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        Err(AdapterError::Unsupported("goal deletion"))
    }

    pub async fn get_goal(&self, goal_id: u64) -> AdapterResult<Goal> {
        let value = call_view(
            self.client.as_ref(),
            self.get_goal.name()?,
            json!({ "goal_id": goal_id }),
            &self.options,
        )
        .await?;
        decode_goal(goal_id, &value)
    }

    /// Ids of all goals owned by a volunteer.
    pub async fn get_user_goals(&self, user: &str) -> AdapterResult<Vec<u64>> {
        validate::assert_address(user, "user")?;
        let value = call_view(
            self.client.as_ref(),
            self.get_goals_by_user.name()?,
            json!({ "volunteer": user }),
            &self.options,
        )
        .await?;
        expect_items(value, "goal ids")?
            .iter()
            .map(|item| {
                envelope::as_u64(item)
                    .ok_or_else(|| AdapterError::ResponseShape(format!("goal id: {item}")))
            })
            .collect()
    }

    pub async fn get_goal_status(&self, goal_id: u64) -> AdapterResult<GoalStatus> {
        let goal = self.get_goal(goal_id).await?;
        Ok(if goal.completed {
            GoalStatus::Completed
        } else {
            GoalStatus::Pending
        })
    }
}

fn decode_goal(requested_id: u64, value: &Value) -> AdapterResult<Goal> {
    if !value.is_object() {
        return Err(AdapterError::ResponseShape(format!("goal: {value}")));
    }
    Ok(Goal {
        id: envelope::u64_field(value, &["id"]).unwrap_or(requested_id),
        volunteer: envelope::string_field(value, &["volunteer", "owner"]),
        kind: envelope::field(value, &["goal_type", "kind"])
            .map(GoalKind::from_value)
            .unwrap_or(GoalKind::Other(String::new())),
        target_amount: envelope::u64_field(value, &["target_amount"]).unwrap_or(0),
        current_amount: envelope::u64_field(value, &["current_amount"]).unwrap_or(0),
        completed: envelope::bool_field(value, &["is_completed", "completed"]),
    })
}
