use serde::{Deserialize, Deserializer};

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::{MonthYear, ServiceName};
use crate::error::{Error, Field, Result};
use crate::model::{
    NewSubscription, Subscription, SubscriptionFilter, Total, TotalQuery, UpdateSubscription,
};
use crate::repo::SubscriptionRepo;

/// Body of a subscription create request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`, absent for an active subscription
    pub end_date: Option<String>,
}

impl TryFrom<CreateSubscriptionRequest> for NewSubscription {
    type Error = Error;

    fn try_from(request: CreateSubscriptionRequest) -> Result<Self> {
        let service_name: ServiceName = request
            .service_name
            .parse()
            .map_err(|reason: String| Error::invalid(Field::ServiceName, reason))?;
        let price = validate_price(request.price)?;
        let user_id = parse_user_id(&request.user_id)?;
        let start_date = MonthYear::parse_field(&request.start_date, Field::StartDate)?;
        let end_date = parse_optional_date(request.end_date.as_deref(), Field::EndDate)?;

        if matches!(end_date, Some(end_date) if end_date < start_date) {
            return Err(Error::invalid(Field::EndDate, "must not precede start_date"));
        }

        Ok(Self {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        })
    }
}

/// Body of a subscription update request, every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub price: Option<i32>,
    pub start_date: Option<String>,
    /// Absent keeps the stored end date, `null` or `""` clears it
    #[serde(default, deserialize_with = "deserialize_present")]
    pub end_date: Option<Option<String>>,
}

/// Wrap a field that is present in the body, so `null` stays distinguishable from absent
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Query of a total cost request
#[derive(Debug, Clone, Deserialize)]
pub struct TotalRequest {
    pub service_name: Option<String>,
    /// `MM-YYYY`
    pub start_period: String,
    /// `MM-YYYY`
    pub end_period: String,
}

/// Subscription use-cases, backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Create a subscription", skip(self))]
    pub async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription> {
        let new_subscription: NewSubscription = request.try_into()?;

        SubscriptionRepo::insert(&self.pool, &new_subscription).await
    }

    #[tracing::instrument(name = "List subscriptions", skip(self))]
    pub async fn list_subscriptions(
        &self,
        user_id: Option<Uuid>,
        service_name: Option<String>,
    ) -> Result<Vec<Subscription>> {
        let filter = SubscriptionFilter {
            user_id,
            service_name: service_name.as_deref().and_then(service_name_filter),
        };

        SubscriptionRepo::list(&self.pool, &filter).await
    }

    #[tracing::instrument(name = "Get a subscription", skip(self))]
    pub async fn get_subscription(&self, user_id: Uuid, service_name: &str) -> Result<Subscription> {
        SubscriptionRepo::fetch(&self.pool, user_id, service_name.trim()).await
    }

    #[tracing::instrument(name = "Update a subscription", skip(self))]
    pub async fn update_subscription(
        &self,
        user_id: Uuid,
        service_name: &str,
        request: UpdateSubscriptionRequest,
    ) -> Result<Subscription> {
        let price = request.price.map(validate_price).transpose()?;
        let start_date = parse_optional_date(request.start_date.as_deref(), Field::StartDate)?;
        let end_date = request
            .end_date
            .map(|end_date| parse_optional_date(end_date.as_deref(), Field::EndDate))
            .transpose()?;

        let update = UpdateSubscription {
            user_id,
            service_name: service_name.trim().to_string(),
            price,
            start_date,
            end_date,
        };

        SubscriptionRepo::update(&self.pool, &update).await
    }

    #[tracing::instrument(name = "Delete a subscription", skip(self))]
    pub async fn delete_subscription(&self, user_id: Uuid, service_name: &str) -> Result<()> {
        SubscriptionRepo::delete(&self.pool, user_id, service_name.trim()).await
    }

    #[tracing::instrument(name = "Get subscriptions total", skip(self))]
    pub async fn get_total(&self, request: TotalRequest, user_id: Option<Uuid>) -> Result<Total> {
        let query = build_total_query(request, user_id)?;

        SubscriptionRepo::total(&self.pool, &query).await
    }
}

/// Parse a canonical UUID string identifying a subscriber
pub fn parse_user_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| Error::invalid(Field::UserId, format!("'{}' is not a valid UUID", value)))
}

fn validate_price(price: i32) -> Result<i32> {
    if price < 0 {
        return Err(Error::invalid(Field::Price, "must not be negative"));
    }
    Ok(price)
}

/// Service names are stored trimmed, so lookups trim too. A blank name filters nothing
fn service_name_filter(service_name: &str) -> Option<String> {
    Some(service_name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Blank values count as absent
fn parse_optional_date(value: Option<&str>, field: Field) -> Result<Option<MonthYear>> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(|value| MonthYear::parse_field(value, field))
        .transpose()
}

fn build_total_query(request: TotalRequest, user_id: Option<Uuid>) -> Result<TotalQuery> {
    let start_period = MonthYear::parse_field(&request.start_period, Field::StartPeriod)?;
    let end_period = MonthYear::parse_field(&request.end_period, Field::EndPeriod)?;

    if end_period < start_period {
        return Err(Error::invalid(Field::EndPeriod, "must not precede start_period"));
    }

    Ok(TotalQuery {
        user_id,
        service_name: request.service_name.as_deref().and_then(service_name_filter),
        start_period,
        end_period,
    })
}
