//! Rental property listings and availability blocks.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use casaflow_common::{AppError, AppResult, id::IdGenerator};
use casaflow_db::entities::property::ListingStatus;
use casaflow_db::entities::{agent, property, property_availability};
use casaflow_db::repositories::{AvailabilityRepository, PropertyFilter, PropertyRepository};

/// Input for creating a rental listing.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: String,
    #[validate(length(max = 128))]
    pub district: Option<String>,
    #[validate(length(max = 256))]
    pub address: Option<String>,
    /// Nightly rate in cents.
    #[validate(range(min = 0))]
    pub price_per_night: Option<i64>,
    /// Monthly rate in cents.
    #[validate(range(min = 0))]
    pub price_per_month: Option<i64>,
    #[validate(range(min = 0, max = 64))]
    pub bedrooms: i16,
    #[validate(range(min = 0, max = 64))]
    pub bathrooms: i16,
    #[validate(range(min = 1))]
    pub area_sqm: Option<i32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub media_keys: Vec<String>,
}

/// Input for updating a rental listing.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 128))]
    pub district: Option<String>,
    #[validate(length(max = 256))]
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub price_per_night: Option<i64>,
    #[validate(range(min = 0))]
    pub price_per_month: Option<i64>,
    #[validate(range(min = 0, max = 64))]
    pub bedrooms: Option<i16>,
    #[validate(range(min = 0, max = 64))]
    pub bathrooms: Option<i16>,
    #[validate(range(min = 1))]
    pub area_sqm: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub media_keys: Option<Vec<String>>,
}

/// Input for manually blocking a date range.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlockDatesInput {
    /// Inclusive start.
    pub start_date: NaiveDate,
    /// Exclusive end.
    pub end_date: NaiveDate,
    #[validate(length(max = 512))]
    pub note: Option<String>,
}

/// Service for rental listings.
#[derive(Clone)]
pub struct PropertyService {
    property_repo: PropertyRepository,
    availability_repo: AvailabilityRepository,
    id_gen: IdGenerator,
}

impl PropertyService {
    /// Create a new property service.
    #[must_use]
    pub const fn new(
        property_repo: PropertyRepository,
        availability_repo: AvailabilityRepository,
    ) -> Self {
        Self {
            property_repo,
            availability_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a listing, checking it belongs to the agent's agency.
    pub async fn get_for_agent(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<property::Model> {
        let property = self.property_repo.get_by_id(id).await?;
        if agent.agency_id.as_deref() != Some(property.agency_id.as_str()) {
            return Err(AppError::Forbidden(
                "Listing belongs to a different agency".to_string(),
            ));
        }
        Ok(property)
    }

    /// List the agency's listings.
    pub async fn list(&self, filter: &PropertyFilter) -> AppResult<(Vec<property::Model>, u64)> {
        self.property_repo.list(filter).await
    }

    /// Create a draft listing.
    pub async fn create(
        &self,
        agent: &agent::Model,
        input: CreatePropertyInput,
    ) -> AppResult<property::Model> {
        input.validate()?;
        let agency_id = agent
            .agency_id
            .clone()
            .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))?;

        let now = Utc::now();
        self.property_repo
            .create(property::ActiveModel {
                id: Set(self.id_gen.generate()),
                agency_id: Set(agency_id),
                agent_id: Set(agent.id.clone()),
                title: Set(input.title),
                description: Set(input.description),
                city: Set(input.city),
                district: Set(input.district),
                address: Set(input.address),
                price_per_night: Set(input.price_per_night),
                price_per_month: Set(input.price_per_month),
                bedrooms: Set(input.bedrooms),
                bathrooms: Set(input.bathrooms),
                area_sqm: Set(input.area_sqm),
                amenities: Set(json!(input.amenities)),
                media_keys: Set(json!(input.media_keys)),
                status: Set(ListingStatus::Draft),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await
    }

    /// Update a listing.
    pub async fn update(
        &self,
        agent: &agent::Model,
        id: &str,
        input: UpdatePropertyInput,
    ) -> AppResult<property::Model> {
        input.validate()?;
        let property = self.get_for_agent(agent, id).await?;

        let mut model: property::ActiveModel = property.into();
        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        if let Some(city) = input.city {
            model.city = Set(city);
        }
        if let Some(district) = input.district {
            model.district = Set(Some(district));
        }
        if let Some(address) = input.address {
            model.address = Set(Some(address));
        }
        if let Some(price) = input.price_per_night {
            model.price_per_night = Set(Some(price));
        }
        if let Some(price) = input.price_per_month {
            model.price_per_month = Set(Some(price));
        }
        if let Some(bedrooms) = input.bedrooms {
            model.bedrooms = Set(bedrooms);
        }
        if let Some(bathrooms) = input.bathrooms {
            model.bathrooms = Set(bathrooms);
        }
        if let Some(area) = input.area_sqm {
            model.area_sqm = Set(Some(area));
        }
        if let Some(amenities) = input.amenities {
            model.amenities = Set(json!(amenities));
        }
        if let Some(media_keys) = input.media_keys {
            model.media_keys = Set(json!(media_keys));
        }
        model.updated_at = Set(Utc::now().into());

        self.property_repo.update(model).await
    }

    /// Publish a listing. Requires at least one price to be set.
    pub async fn publish(&self, agent: &agent::Model, id: &str) -> AppResult<property::Model> {
        let property = self.get_for_agent(agent, id).await?;

        if property.price_per_night.is_none() && property.price_per_month.is_none() {
            return Err(AppError::BadRequest(
                "A nightly or monthly price is required to publish".to_string(),
            ));
        }

        self.set_status(property, ListingStatus::Published).await
    }

    /// Archive a listing. Existing bookings are unaffected.
    pub async fn archive(&self, agent: &agent::Model, id: &str) -> AppResult<property::Model> {
        let property = self.get_for_agent(agent, id).await?;
        self.set_status(property, ListingStatus::Archived).await
    }

    async fn set_status(
        &self,
        property: property::Model,
        status: ListingStatus,
    ) -> AppResult<property::Model> {
        let mut model: property::ActiveModel = property.into();
        model.status = Set(status);
        model.updated_at = Set(Utc::now().into());
        self.property_repo.update(model).await
    }

    /// Delete a draft listing. Published and archived listings can only be
    /// archived, never deleted.
    pub async fn delete(&self, agent: &agent::Model, id: &str) -> AppResult<()> {
        let property = self.get_for_agent(agent, id).await?;
        if property.status != ListingStatus::Draft {
            return Err(AppError::BadRequest(
                "Only draft listings can be deleted".to_string(),
            ));
        }
        self.property_repo.delete(id).await
    }

    /// List a listing's availability rows.
    pub async fn availability(
        &self,
        agent: &agent::Model,
        property_id: &str,
    ) -> AppResult<Vec<property_availability::Model>> {
        self.get_for_agent(agent, property_id).await?;
        self.availability_repo.find_by_property(property_id).await
    }

    /// Manually block a date range (maintenance, owner stays).
    pub async fn block_dates(
        &self,
        agent: &agent::Model,
        property_id: &str,
        input: BlockDatesInput,
    ) -> AppResult<property_availability::Model> {
        input.validate()?;
        self.get_for_agent(agent, property_id).await?;

        if input.end_date <= input.start_date {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        if AvailabilityRepository::has_conflict(
            self.availability_repo.connection(),
            property_id,
            input.start_date,
            input.end_date,
            None,
        )
        .await?
        {
            return Err(AppError::BadRequest(
                "Requested dates are not available for this property".to_string(),
            ));
        }

        let now = Utc::now();
        self.availability_repo
            .create(property_availability::ActiveModel {
                id: Set(self.id_gen.generate()),
                property_id: Set(property_id.to_string()),
                start_date: Set(input.start_date),
                end_date: Set(input.end_date),
                is_available: Set(false),
                booking_id: Set(None),
                note: Set(input.note),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await
    }

    /// Remove a manual block. Blocks created by bookings are released by
    /// cancelling the booking, never directly.
    pub async fn unblock(
        &self,
        agent: &agent::Model,
        property_id: &str,
        block_id: &str,
    ) -> AppResult<()> {
        self.get_for_agent(agent, property_id).await?;

        let block = self
            .availability_repo
            .find_by_id(block_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("availability block {block_id}")))?;

        if block.property_id != property_id {
            return Err(AppError::NotFound(format!("availability block {block_id}")));
        }
        if block.booking_id.is_some() {
            return Err(AppError::BadRequest(
                "This block is managed by a booking; cancel the booking instead".to_string(),
            ));
        }

        self.availability_repo.delete(block_id).await
    }
}
