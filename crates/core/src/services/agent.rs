//! Agent profile and roster management.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use casaflow_common::{AppError, AppResult};
use casaflow_db::entities::agent;
use casaflow_db::entities::agent::AgentRole;
use casaflow_db::repositories::AgentRepository;

/// Onboarding step after the profile has been filled in.
const STEP_PROFILE: i16 = 2;

/// Onboarding step after onboarding is complete.
const STEP_DONE: i16 = 4;

/// Input for updating the authenticated agent's profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Service for agent profiles and agency rosters.
#[derive(Clone)]
pub struct AgentService {
    agent_repo: AgentRepository,
}

impl AgentService {
    /// Create a new agent service.
    #[must_use]
    pub const fn new(agent_repo: AgentRepository) -> Self {
        Self { agent_repo }
    }

    /// Get an agent by ID.
    pub async fn get(&self, id: &str) -> AppResult<agent::Model> {
        self.agent_repo.get_by_id(id).await
    }

    /// Update the agent's own profile. Filling the profile advances
    /// onboarding past the profile step.
    pub async fn update_profile(
        &self,
        agent_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<agent::Model> {
        input.validate()?;

        let agent = self.agent_repo.get_by_id(agent_id).await?;
        let step = agent.onboarding_step;

        let mut model: agent::ActiveModel = agent.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(phone) = input.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(avatar_url) = input.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }
        if step < STEP_PROFILE {
            model.onboarding_step = Set(STEP_PROFILE);
        }
        model.updated_at = Set(Utc::now().into());

        self.agent_repo.update(model).await
    }

    /// Mark onboarding finished. Requires the agent to have an agency.
    pub async fn complete_onboarding(&self, agent_id: &str) -> AppResult<agent::Model> {
        let agent = self.agent_repo.get_by_id(agent_id).await?;

        if agent.agency_id.is_none() {
            return Err(AppError::BadRequest(
                "Create or join an agency before finishing onboarding".to_string(),
            ));
        }
        if agent.onboarding_step >= STEP_DONE {
            return Ok(agent);
        }

        let mut model: agent::ActiveModel = agent.into();
        model.onboarding_step = Set(STEP_DONE);
        model.updated_at = Set(Utc::now().into());
        self.agent_repo.update(model).await
    }

    /// List the roster of an agency.
    pub async fn list_by_agency(&self, agency_id: &str) -> AppResult<Vec<agent::Model>> {
        self.agent_repo.find_by_agency(agency_id).await
    }

    /// Remove an agent from the admin's agency. Admins cannot remove
    /// themselves.
    pub async fn remove(&self, admin: &agent::Model, agent_id: &str) -> AppResult<()> {
        if admin.role != AgentRole::Admin {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        if admin.id == agent_id {
            return Err(AppError::BadRequest(
                "Admins cannot remove themselves".to_string(),
            ));
        }

        let target = self.agent_repo.get_by_id(agent_id).await?;
        if target.agency_id != admin.agency_id {
            return Err(AppError::Forbidden(
                "Agent belongs to a different agency".to_string(),
            ));
        }

        self.agent_repo.delete(agent_id).await
    }
}
