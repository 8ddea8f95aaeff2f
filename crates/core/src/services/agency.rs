//! Agency creation, membership and branding.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use casaflow_common::{AppError, AppResult, id::IdGenerator};
use casaflow_db::entities::agent::AgentRole;
use casaflow_db::entities::{agency, agent};
use casaflow_db::repositories::{AgencyRepository, AgentRepository};

/// Onboarding step after the agency has been set up.
const STEP_AGENCY: i16 = 3;

/// Input for creating an agency.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgencyInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub contact_email: String,
    #[validate(length(max = 32))]
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub service_locations: Vec<String>,
}

/// Input for updating agency branding and contact details.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgencyInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 32))]
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub service_locations: Option<Vec<String>>,
}

/// Service for agencies.
#[derive(Clone)]
pub struct AgencyService {
    agency_repo: AgencyRepository,
    agent_repo: AgentRepository,
    id_gen: IdGenerator,
}

impl AgencyService {
    /// Create a new agency service.
    #[must_use]
    pub const fn new(agency_repo: AgencyRepository, agent_repo: AgentRepository) -> Self {
        Self {
            agency_repo,
            agent_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an agency by ID.
    pub async fn get(&self, id: &str) -> AppResult<agency::Model> {
        self.agency_repo.get_by_id(id).await
    }

    /// Create an agency and make the creating agent its admin.
    pub async fn create(
        &self,
        agent: &agent::Model,
        input: CreateAgencyInput,
    ) -> AppResult<agency::Model> {
        input.validate()?;

        if agent.agency_id.is_some() {
            return Err(AppError::BadRequest(
                "Agent already belongs to an agency".to_string(),
            ));
        }
        validate_colors(input.primary_color.as_deref(), input.secondary_color.as_deref())?;

        let now = Utc::now();
        let agency = self
            .agency_repo
            .create(agency::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(input.name),
                primary_color: Set(input.primary_color),
                secondary_color: Set(input.secondary_color),
                logo_url: Set(None),
                contact_email: Set(input.contact_email.to_lowercase()),
                contact_phone: Set(input.contact_phone),
                website: Set(input.website),
                service_locations: Set(json!(input.service_locations)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await?;

        self.attach(agent, &agency.id, AgentRole::Admin).await?;
        Ok(agency)
    }

    /// Join an existing agency as a regular agent.
    pub async fn join(&self, agent: &agent::Model, agency_id: &str) -> AppResult<agency::Model> {
        if agent.agency_id.is_some() {
            return Err(AppError::BadRequest(
                "Agent already belongs to an agency".to_string(),
            ));
        }

        let agency = self.agency_repo.get_by_id(agency_id).await?;
        self.attach(agent, &agency.id, AgentRole::Agent).await?;
        Ok(agency)
    }

    async fn attach(
        &self,
        agent: &agent::Model,
        agency_id: &str,
        role: AgentRole,
    ) -> AppResult<agent::Model> {
        let step = agent.onboarding_step.max(STEP_AGENCY);
        let mut model: agent::ActiveModel = agent.clone().into();
        model.agency_id = Set(Some(agency_id.to_string()));
        model.role = Set(role);
        model.onboarding_step = Set(step);
        model.updated_at = Set(Utc::now().into());
        self.agent_repo.update(model).await
    }

    /// Update agency details. Admin only.
    pub async fn update(
        &self,
        admin: &agent::Model,
        agency_id: &str,
        input: UpdateAgencyInput,
    ) -> AppResult<agency::Model> {
        input.validate()?;

        if admin.role != AgentRole::Admin || admin.agency_id.as_deref() != Some(agency_id) {
            return Err(AppError::Forbidden(
                "Only the agency admin can update the agency".to_string(),
            ));
        }
        validate_colors(input.primary_color.as_deref(), input.secondary_color.as_deref())?;

        let agency = self.agency_repo.get_by_id(agency_id).await?;
        let mut model: agency::ActiveModel = agency.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(email) = input.contact_email {
            model.contact_email = Set(email.to_lowercase());
        }
        if let Some(phone) = input.contact_phone {
            model.contact_phone = Set(Some(phone));
        }
        if let Some(website) = input.website {
            model.website = Set(Some(website));
        }
        if let Some(color) = input.primary_color {
            model.primary_color = Set(Some(color));
        }
        if let Some(color) = input.secondary_color {
            model.secondary_color = Set(Some(color));
        }
        if let Some(logo_url) = input.logo_url {
            model.logo_url = Set(Some(logo_url));
        }
        if let Some(locations) = input.service_locations {
            model.service_locations = Set(json!(locations));
        }
        model.updated_at = Set(Utc::now().into());

        self.agency_repo.update(model).await
    }
}

fn validate_colors(primary: Option<&str>, secondary: Option<&str>) -> AppResult<()> {
    for color in [primary, secondary].into_iter().flatten() {
        if !is_hex_color(color) {
            return Err(AppError::Validation(format!(
                "Invalid hex color: {color}"
            )));
        }
    }
    Ok(())
}

fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_validation() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
    }
}
