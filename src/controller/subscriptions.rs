use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use serde::Deserialize;

use uuid::Uuid;

use crate::controller::error::RestResult;
use crate::service::{
    parse_user_id, CreateSubscriptionRequest, SubscriptionService, TotalRequest,
    UpdateSubscriptionRequest,
};

/// Optional `user_id`/`service_name` query filters
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    user_id: Option<String>,
    service_name: Option<String>,
}

impl FilterQuery {
    /// Blank values mean "no filter"
    fn parse(self) -> RestResult<(Option<Uuid>, Option<String>)> {
        let user_id = self
            .user_id
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_user_id(&value))
            .transpose()?;
        let service_name = self.service_name.filter(|value| !value.trim().is_empty());

        Ok((user_id, service_name))
    }
}

/// Create endpoint for new subscriptions
#[tracing::instrument(name = "Create a new subscription", skip(service))]
#[post("")]
async fn create(
    service: web::Data<SubscriptionService>,
    body: web::Json<CreateSubscriptionRequest>,
) -> RestResult<impl Responder> {
    let subscription = service.create_subscription(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(subscription))
}

/// List subscriptions, optionally filtered by user and service
#[tracing::instrument(name = "List subscriptions", skip(service))]
#[get("")]
async fn list(
    service: web::Data<SubscriptionService>,
    query: web::Query<FilterQuery>,
) -> RestResult<impl Responder> {
    let (user_id, service_name) = query.into_inner().parse()?;

    let subscriptions = service.list_subscriptions(user_id, service_name).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

/// Total cost of the subscriptions active within a period
#[tracing::instrument(name = "Get subscriptions total", skip(service))]
#[get("/total")]
async fn total(
    service: web::Data<SubscriptionService>,
    filters: web::Query<FilterQuery>,
    period: web::Query<TotalRequest>,
) -> RestResult<impl Responder> {
    let (user_id, _) = filters.into_inner().parse()?;

    let total = service.get_total(period.into_inner(), user_id).await?;

    Ok(HttpResponse::Ok().json(total))
}

#[tracing::instrument(name = "Get a subscription", skip(service))]
#[get("/{user_id}/{service_name}")]
async fn fetch(
    service: web::Data<SubscriptionService>,
    path: web::Path<(String, String)>,
) -> RestResult<impl Responder> {
    let (user_id, service_name) = path.into_inner();
    let user_id = parse_user_id(&user_id)?;

    let subscription = service.get_subscription(user_id, &service_name).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(name = "Update a subscription", skip(service))]
#[put("/{user_id}/{service_name}")]
async fn update(
    service: web::Data<SubscriptionService>,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateSubscriptionRequest>,
) -> RestResult<impl Responder> {
    let (user_id, service_name) = path.into_inner();
    let user_id = parse_user_id(&user_id)?;

    let subscription = service
        .update_subscription(user_id, &service_name, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(name = "Delete a subscription", skip(service))]
#[delete("/{user_id}/{service_name}")]
async fn remove(
    service: web::Data<SubscriptionService>,
    path: web::Path<(String, String)>,
) -> RestResult<impl Responder> {
    let (user_id, service_name) = path.into_inner();
    let user_id = parse_user_id(&user_id)?;

    service.delete_subscription(user_id, &service_name).await?;

    Ok(HttpResponse::Ok())
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscriptions")
        .service(create)
        .service(list)
        .service(total)
        .service(fetch)
        .service(update)
        .service(remove)
}
