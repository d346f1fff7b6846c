use uuid::Uuid;

use serde::Serialize;

use crate::domain::{MonthYear, ServiceName};

/// New Subscription request, already validated
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    /// `None` while the subscription is still active
    pub end_date: Option<MonthYear>,
}

/// Stored Subscription record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

/// Partial update of the subscription identified by `(user_id, service_name)`
#[derive(Debug, Clone)]
pub struct UpdateSubscription {
    pub user_id: Uuid,
    pub service_name: String,
    /// Kept as stored when `None`
    pub price: Option<i32>,
    /// Kept as stored when `None`
    pub start_date: Option<MonthYear>,
    /// Kept as stored when `None`, `Some(None)` clears the stored end date
    pub end_date: Option<Option<MonthYear>>,
}

/// Optional predicates for listing subscriptions
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

/// Cost aggregation over the subscriptions active in a period
#[derive(Debug, Clone)]
pub struct TotalQuery {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_period: MonthYear,
    pub end_period: MonthYear,
}

/// Aggregated cost and number of the subscriptions matched by a `TotalQuery`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Total {
    pub total_cost: i64,
    pub count: i64,
}
