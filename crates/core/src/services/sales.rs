//! Sales listings and closed transactions.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use casaflow_common::{AppError, AppResult, id::IdGenerator};
use casaflow_db::entities::commission::CommissionStatus;
use casaflow_db::entities::sales_property::SalesStatus;
use casaflow_db::entities::{agent, sales_commission, sales_property, sales_transaction};
use casaflow_db::repositories::{
    AgentRepository, ClosedSale, PropertyFilter, SalesPropertyRepository,
    SalesTransactionRepository,
};

use crate::commission::sales_split;

/// Input for creating a sales listing.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesPropertyInput {
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
    /// Asking price in cents.
    #[validate(range(min = 1))]
    pub price: i64,
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

/// Input for updating a sales listing.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalesPropertyInput {
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
    #[validate(range(min = 1))]
    pub price: Option<i64>,
    #[validate(range(min = 0, max = 64))]
    pub bedrooms: Option<i16>,
    #[validate(range(min = 0, max = 64))]
    pub bathrooms: Option<i16>,
    #[validate(range(min = 1))]
    pub area_sqm: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub media_keys: Option<Vec<String>>,
}

/// Input for closing a sale.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CloseSaleInput {
    /// Agent who brought the buyer. Defaults to the acting agent.
    pub selling_agent_id: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub buyer_name: String,
    #[validate(email)]
    pub buyer_email: Option<String>,
    #[validate(length(max = 32))]
    pub buyer_phone: Option<String>,
    /// Final price in cents. Defaults to the asking price.
    #[validate(range(min = 1))]
    pub sale_price: Option<i64>,
    /// Defaults to today.
    pub closed_on: Option<NaiveDate>,
}

/// Service for the sales product line.
#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesPropertyRepository,
    transaction_repo: SalesTransactionRepository,
    agent_repo: AgentRepository,
    id_gen: IdGenerator,
}

impl SalesService {
    /// Create a new sales service.
    #[must_use]
    pub const fn new(
        sales_repo: SalesPropertyRepository,
        transaction_repo: SalesTransactionRepository,
        agent_repo: AgentRepository,
    ) -> Self {
        Self {
            sales_repo,
            transaction_repo,
            agent_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a sales listing, checking it belongs to the agent's agency.
    pub async fn get_for_agent(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<sales_property::Model> {
        let listing = self.sales_repo.get_by_id(id).await?;
        if agent.agency_id.as_deref() != Some(listing.agency_id.as_str()) {
            return Err(AppError::Forbidden(
                "Listing belongs to a different agency".to_string(),
            ));
        }
        Ok(listing)
    }

    /// List the agency's sales listings.
    pub async fn list(
        &self,
        filter: &PropertyFilter,
        status: Option<SalesStatus>,
    ) -> AppResult<(Vec<sales_property::Model>, u64)> {
        self.sales_repo.list(filter, status).await
    }

    /// Create a draft sales listing.
    pub async fn create(
        &self,
        agent: &agent::Model,
        input: CreateSalesPropertyInput,
    ) -> AppResult<sales_property::Model> {
        input.validate()?;
        let agency_id = agent
            .agency_id
            .clone()
            .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))?;

        let now = Utc::now();
        self.sales_repo
            .create(sales_property::ActiveModel {
                id: Set(self.id_gen.generate()),
                agency_id: Set(agency_id),
                agent_id: Set(agent.id.clone()),
                title: Set(input.title),
                description: Set(input.description),
                city: Set(input.city),
                district: Set(input.district),
                address: Set(input.address),
                price: Set(input.price),
                bedrooms: Set(input.bedrooms),
                bathrooms: Set(input.bathrooms),
                area_sqm: Set(input.area_sqm),
                amenities: Set(json!(input.amenities)),
                media_keys: Set(json!(input.media_keys)),
                status: Set(SalesStatus::Draft),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await
    }

    /// Update a sales listing. Sold listings are immutable.
    pub async fn update(
        &self,
        agent: &agent::Model,
        id: &str,
        input: UpdateSalesPropertyInput,
    ) -> AppResult<sales_property::Model> {
        input.validate()?;
        let listing = self.get_for_agent(agent, id).await?;

        if listing.status == SalesStatus::Sold {
            return Err(AppError::BadRequest(
                "Sold listings cannot be edited".to_string(),
            ));
        }

        let mut model: sales_property::ActiveModel = listing.into();
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
        if let Some(price) = input.price {
            model.price = Set(price);
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

        self.sales_repo.update(model).await
    }

    /// Publish a sales listing.
    pub async fn publish(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<sales_property::Model> {
        let listing = self.get_for_agent(agent, id).await?;
        if listing.status == SalesStatus::Sold {
            return Err(AppError::BadRequest(
                "Sold listings cannot be republished".to_string(),
            ));
        }
        self.set_status(listing, SalesStatus::Published).await
    }

    /// Archive a sales listing.
    pub async fn archive(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<sales_property::Model> {
        let listing = self.get_for_agent(agent, id).await?;
        if listing.status == SalesStatus::Sold {
            return Err(AppError::BadRequest(
                "Sold listings cannot be archived".to_string(),
            ));
        }
        self.set_status(listing, SalesStatus::Archived).await
    }

    async fn set_status(
        &self,
        listing: sales_property::Model,
        status: SalesStatus,
    ) -> AppResult<sales_property::Model> {
        let mut model: sales_property::ActiveModel = listing.into();
        model.status = Set(status);
        model.updated_at = Set(Utc::now().into());
        self.sales_repo.update(model).await
    }

    /// Delete a draft sales listing.
    pub async fn delete(&self, agent: &agent::Model, id: &str) -> AppResult<()> {
        let listing = self.get_for_agent(agent, id).await?;
        if listing.status != SalesStatus::Draft {
            return Err(AppError::BadRequest(
                "Only draft listings can be deleted".to_string(),
            ));
        }
        self.sales_repo.delete(id).await
    }

    /// Close a sale: record the transaction, split the commission pool
    /// 48/48/4 between listing agent, selling agent and platform, and mark
    /// the listing sold. Atomic; closing an already-sold listing fails.
    pub async fn close_sale(
        &self,
        agent: &agent::Model,
        id: &str,
        input: CloseSaleInput,
    ) -> AppResult<(sales_transaction::Model, sales_commission::Model)> {
        input.validate()?;
        let listing = self.get_for_agent(agent, id).await?;

        if listing.status == SalesStatus::Draft {
            return Err(AppError::BadRequest(
                "Publish the listing before closing a sale".to_string(),
            ));
        }

        let selling_agent_id = match input.selling_agent_id {
            Some(other_id) if other_id != agent.id => {
                let seller = self.agent_repo.get_by_id(&other_id).await?;
                if seller.agency_id != agent.agency_id {
                    return Err(AppError::BadRequest(
                        "Selling agent belongs to a different agency".to_string(),
                    ));
                }
                other_id
            }
            _ => agent.id.clone(),
        };

        let sale_price = input.sale_price.unwrap_or(listing.price);
        let split = sales_split(sale_price);

        let transaction_id = self.id_gen.generate();
        let now = Utc::now();
        let closed_on = input.closed_on.unwrap_or_else(|| now.date_naive());

        self.transaction_repo
            .close_sale(ClosedSale {
                transaction: sales_transaction::ActiveModel {
                    id: Set(transaction_id.clone()),
                    sales_property_id: Set(listing.id.clone()),
                    listing_agent_id: Set(listing.agent_id.clone()),
                    selling_agent_id: Set(selling_agent_id),
                    buyer_name: Set(input.buyer_name),
                    buyer_email: Set(input.buyer_email.map(|e| e.to_lowercase())),
                    buyer_phone: Set(input.buyer_phone),
                    sale_price: Set(sale_price),
                    closed_on: Set(closed_on),
                    created_at: Set(now.into()),
                },
                commission: sales_commission::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    transaction_id: Set(transaction_id),
                    pool: Set(split.pool),
                    listing_commission: Set(split.listing_commission),
                    selling_commission: Set(split.selling_commission),
                    platform_fee: Set(split.platform_fee),
                    status: Set(CommissionStatus::Pending),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                },
                sales_property_id: listing.id,
            })
            .await
    }

    /// Transactions recorded against a listing.
    pub async fn transactions(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<Vec<sales_transaction::Model>> {
        self.get_for_agent(agent, id).await?;
        self.transaction_repo.find_by_property(id).await
    }
}
