use std::env;
use std::net::TcpListener;

use anyhow::Context;
use tracing::info;

use news_aggregator::configuration::{database_url, Configuration};
use news_aggregator::database::init_sqlite_connection;
use news_aggregator::rate_limiting::build_rate_limiting_conf;
use news_aggregator::services::feeds::build_client;
use news_aggregator::services::fetching::Aggregator;
use news_aggregator::startup::{startup, AppState};
use news_aggregator::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("news_aggregator", "info");
    observability::init_subscriber(subscriber)?;

    let configuration = Configuration::from_env()?;
    let pool = init_sqlite_connection(&database_url())
        .await
        .context("Could not set up the article database")?;
    let client = build_client(configuration.fetch_timeout)?;
    let governor_conf = build_rate_limiting_conf()?;

    let address =
        env::var("NEWS_AGGREGATOR_LISTEN_ON").unwrap_or_else(|_| String::from("0.0.0.0:8080"));
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Could not listen on {}", address))?;
    info!(
        "Listening on {} with {} sources",
        address,
        configuration.sources.len()
    );

    let app_state = AppState {
        pool: pool.clone(),
        aggregator: Aggregator::new(client, pool, configuration),
    };
    startup(app_state, governor_conf, listener).await?;

    opentelemetry::global::shutdown_tracer_provider();
    Ok(())
}
