use anyhow::Context;
use tracing::{error, info};

use news_aggregator::configuration::{database_url, Configuration};
use news_aggregator::database::init_sqlite_connection;
use news_aggregator::model::SourceOutcome;
use news_aggregator::observability;
use news_aggregator::services::feeds::build_client;
use news_aggregator::services::fetching::Aggregator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("news_aggregator-fetcher", "info");
    observability::init_subscriber(subscriber)?;

    let configuration = Configuration::from_env()?;
    let pool = init_sqlite_connection(&database_url())
        .await
        .context("Could not set up the article database")?;
    let client = build_client(configuration.fetch_timeout).context("Could not build client")?;

    let aggregator = Aggregator::new(client, pool, configuration);
    let result = aggregator.run().await;

    match &result {
        Ok(report) => {
            for source in &report.sources {
                match &source.outcome {
                    SourceOutcome::Completed(tally) => {
                        info!("{}: {} new articles", source.source, tally.inserted)
                    }
                    SourceOutcome::Failed { reason } => error!("{}: {}", source.source, reason),
                }
            }
            info!("Successfully scraped {} new articles", report.total_inserted());
        }
        Err(err) => error!("Ho noes! {err}"),
    }

    opentelemetry::global::shutdown_tracer_provider();
    result.map(|_| ()).context("Aggregation failed")
}
