use uuid::Uuid;

use chrono::NaiveDate;

use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::error::{Error, Field, Result};
use crate::model::{
    NewSubscription, Subscription, SubscriptionFilter, Total, TotalQuery, UpdateSubscription,
};

const PRICE_CONSTRAINT: &str = "subscriptions_price_non_negative";
const END_DATE_CONSTRAINT: &str = "subscriptions_end_after_start";

/// Raw `subscriptions` row, dates as stored by the database
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    service_name: String,
    price: i32,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: row.start_date.into(),
            end_date: row.end_date.map(Into::into),
        }
    }
}

/// Repository for interfacing with the subscriptions table
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Insert a new subscription, failing with `Conflict` if the user already subscribes to the service
    #[tracing::instrument(name = "Insert subscription", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_subscription: &NewSubscription,
    ) -> Result<Subscription> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            "insert into subscriptions(service_name, price, user_id, start_date, end_date) \
             values ($1, $2, $3, $4, $5) \
             returning service_name, price, user_id, start_date, end_date",
        )
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price)
        .bind(new_subscription.user_id)
        .bind(new_subscription.start_date.as_date())
        .bind(new_subscription.end_date.map(|date| date.as_date()))
        .fetch_one(executor)
        .await
        .map_err(map_write_error)?;

        tracing::info!(
            user_id = %row.user_id,
            service_name = %row.service_name,
            "Subscription created"
        );

        Ok(row.into())
    }

    #[tracing::instrument(name = "List subscriptions", skip(executor))]
    pub async fn list<'con>(
        executor: impl PgExecutor<'con>,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "select service_name, price, user_id, start_date, end_date from subscriptions where true",
        );
        push_filters(&mut query, filter.user_id, filter.service_name.as_deref());
        query.push(" order by user_id, service_name");

        let rows = query
            .build_query_as::<SubscriptionRow>()
            .fetch_all(executor)
            .await?;

        tracing::debug!(count = rows.len(), "Fetched subscriptions");

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Fetch subscription by user and service", skip(executor))]
    pub async fn fetch<'con>(
        executor: impl PgExecutor<'con>,
        user_id: Uuid,
        service_name: &str,
    ) -> Result<Subscription> {
        let maybe_row = sqlx::query_as::<_, SubscriptionRow>(
            "select service_name, price, user_id, start_date, end_date \
             from subscriptions where user_id=$1 and service_name=$2",
        )
        .bind(user_id)
        .bind(service_name)
        .fetch_optional(executor)
        .await?;

        maybe_row.map(Into::into).ok_or(Error::NotFound)
    }

    /// Apply a partial update, returning the record as stored afterwards
    #[tracing::instrument(name = "Update subscription", skip(executor))]
    pub async fn update<'con>(
        executor: impl PgExecutor<'con>,
        update: &UpdateSubscription,
    ) -> Result<Subscription> {
        let maybe_row = sqlx::query_as::<_, SubscriptionRow>(
            "update subscriptions set \
                price=coalesce($1, price), \
                start_date=coalesce($2, start_date), \
                end_date=case when $6 then $3 else end_date end \
             where user_id=$4 and service_name=$5 \
             returning service_name, price, user_id, start_date, end_date",
        )
        .bind(update.price)
        .bind(update.start_date.map(|date| date.as_date()))
        .bind(update.end_date.flatten().map(|date| date.as_date()))
        .bind(update.user_id)
        .bind(&update.service_name)
        .bind(update.end_date.is_some())
        .fetch_optional(executor)
        .await
        .map_err(|error| match map_write_error(error) {
            // Only the start date moved, so it is the one out of order with the stored end
            Error::InvalidInput {
                field: Field::EndDate,
                ..
            } if update.start_date.is_some() && update.end_date.is_none() => {
                Error::invalid(Field::StartDate, "must not follow end_date")
            }
            error => error,
        })?;

        maybe_row.map(Into::into).ok_or(Error::NotFound)
    }

    #[tracing::instrument(name = "Delete subscription", skip(executor))]
    pub async fn delete<'con>(
        executor: impl PgExecutor<'con>,
        user_id: Uuid,
        service_name: &str,
    ) -> Result<()> {
        let result = sqlx::query("delete from subscriptions where user_id=$1 and service_name=$2")
            .bind(user_id)
            .bind(service_name)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    /// Sum the prices of the subscriptions active at any point of the queried period
    #[tracing::instrument(name = "Compute subscriptions total", skip(executor))]
    pub async fn total<'con>(executor: impl PgExecutor<'con>, query: &TotalQuery) -> Result<Total> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "select coalesce(sum(price), 0)::bigint as total_cost, count(*) as count \
             from subscriptions where start_date <= ",
        );
        builder
            .push_bind(query.end_period.as_date())
            .push(" and (end_date is null or end_date >= ")
            .push_bind(query.start_period.as_date())
            .push(")");
        push_filters(&mut builder, query.user_id, query.service_name.as_deref());

        let total = builder.build_query_as::<Total>().fetch_one(executor).await?;

        Ok(total)
    }
}

/// Append the optional user/service predicates, each only when supplied
fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    user_id: Option<Uuid>,
    service_name: Option<&str>,
) {
    if let Some(user_id) = user_id {
        query.push(" and user_id = ").push_bind(user_id);
    }
    if let Some(service_name) = service_name {
        query
            .push(" and service_name = ")
            .push_bind(service_name.to_owned());
    }
}

/// Translate constraint violations raised by inserts/updates into domain errors
fn map_write_error(error: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return Error::Conflict;
        }
        let violated = match db_error.constraint() {
            Some(PRICE_CONSTRAINT) => Some((Field::Price, "must not be negative")),
            Some(END_DATE_CONSTRAINT) => Some((Field::EndDate, "must not precede start_date")),
            _ => None,
        };
        if let Some((field, reason)) = violated {
            return Error::invalid(field, reason);
        }
    }
    Error::Internal(error)
}
