use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use crate::controller::{error, subscriptions};
use crate::service::SubscriptionService;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, pool: PgPool) -> anyhow::Result<Server> {
    // Wrap application data
    let subscription_service = web::Data::new(SubscriptionService::new(pool));

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(subscription_service.clone())
            .app_data(error::json_config())
            .app_data(error::query_config())
            .service(health_check)
            .service(subscriptions::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
