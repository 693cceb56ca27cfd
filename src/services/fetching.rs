use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use sqlx::SqliteConnection;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::articles::{article_exists, insert_article, lock_for_writing};
use crate::configuration::{Configuration, FeedSource};
use crate::errors::{AggregationError, EntryMappingError, IngestError};
use crate::model::{
    AggregationReport, EntryFailure, EntryOutcome, RawEntry, SourceOutcome, SourceReport,
    SourceTally,
};
use crate::services::entries::map_entry;
use crate::services::feeds::fetch_entries;
use crate::{DbError, Pool};

/// Fetch the configured sources and store their new articles
#[derive(Clone)]
pub struct Aggregator {
    client: ClientWithMiddleware,
    pool: Pool,
    configuration: Configuration,
}

impl Aggregator {
    pub fn new(client: ClientWithMiddleware, pool: Pool, configuration: Configuration) -> Self {
        Self {
            client,
            pool,
            configuration,
        }
    }

    /// Ingest every configured source, one after the other.
    ///
    /// A failing source is reported and skipped, only an unreachable store fails the run.
    #[tracing::instrument(skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self) -> Result<AggregationReport, AggregationError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AggregationError::StoreUnavailable)?;

        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let mut sources = Vec::with_capacity(self.configuration.sources.len());
        for (index, source) in self.configuration.sources.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.configuration.pacing).await;
            }

            let outcome = match self.ingest_source(source).await {
                Ok(tally) => {
                    info!(
                        "Added {} articles from {} ({} already known, {} skipped)",
                        tally.inserted,
                        source.name,
                        tally.duplicates,
                        tally.failures.len()
                    );
                    SourceOutcome::Completed(tally)
                }
                Err(error) => {
                    error!("Could not ingest {}: {}", source.name, error);
                    SourceOutcome::Failed {
                        reason: error.to_string(),
                    }
                }
            };

            sources.push(SourceReport {
                source: source.name.clone(),
                outcome,
            });
        }

        let report = AggregationReport { run_id, sources };
        info!(
            "Aggregation done: {} new articles, {} failed sources",
            report.total_inserted(),
            report.failed_sources().count()
        );

        Ok(report)
    }

    /// Fetch one source and store its new articles in a single transaction.
    ///
    /// Only the first entries of the feed are considered. Nothing is stored if the feed can't be
    /// fetched or if the store fails along the way.
    #[tracing::instrument(skip(self, source), fields(source = %source.name, url = %source.url))]
    pub async fn ingest_source(&self, source: &FeedSource) -> Result<SourceTally, IngestError> {
        let entries = fetch_entries(&self.client, &source.url).await?;
        let now = Utc::now();

        let mut tally = SourceTally::default();
        let mut txn = self.pool.begin().await?;
        lock_for_writing(&mut *txn).await?;

        let considered = entries
            .iter()
            .take(self.configuration.max_entries_per_source);
        for (position, entry) in considered.enumerate() {
            match self.ingest_entry(&mut txn, entry, source, now).await? {
                EntryOutcome::Inserted => tally.inserted += 1,
                EntryOutcome::Duplicate => tally.duplicates += 1,
                EntryOutcome::Failed(error) => {
                    warn!("Skipping entry {} of {}: {}", position, source.name, error);
                    tally.failures.push(EntryFailure {
                        position,
                        title: entry.title.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        txn.commit().await?;

        Ok(tally)
    }

    async fn ingest_entry(
        &self,
        connection: &mut SqliteConnection,
        entry: &RawEntry,
        source: &FeedSource,
        now: DateTime<Utc>,
    ) -> Result<EntryOutcome, DbError> {
        let url = entry
            .link
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());
        let Some(url) = url else {
            return Ok(EntryOutcome::Failed(EntryMappingError::MissingUrl));
        };

        if article_exists(&mut *connection, url).await? {
            debug!("{} is already known", url);
            return Ok(EntryOutcome::Duplicate);
        }

        let article = map_entry(entry, source, now, self.configuration.summary_max_length);
        insert_article(&mut *connection, &article).await?;

        Ok(EntryOutcome::Inserted)
    }
}
