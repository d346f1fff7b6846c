use std::net::TcpListener;

use anyhow::Context;

use sqlx::PgPool;

use subtrack::app;
use subtrack::settings::Settings;
use subtrack::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    let subscriber = telemetry::create_subscriber(settings.app.log_level(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let pool = PgPool::connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate the database")?;
    tracing::info!("Database migrations applied");

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(listener, pool)?.await.context("Failed to run app")
}
