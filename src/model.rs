use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A news article, as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub content: String,
    pub source: String,
    pub category: String,
    pub author: String,
    pub publication_date: DateTime<Utc>,
    pub scraped_date: DateTime<Utc>,
    pub image_url: Option<String>,
}

/// Article representation to be inserted in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub content: String,
    pub source: String,
    pub category: String,
    pub author: String,
    pub publication_date: DateTime<Utc>,
    pub image_url: Option<String>,
}

/// One entry of a feed, before any normalization. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Vec<ContentBlock>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub media_content: Vec<MediaReference>,
    pub media_thumbnails: Vec<MediaReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBlock {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaReference {
    pub url: Option<String>,
}

/// Filters applied when listing articles. Every filter is a case insensitive substring match.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub source: Option<String>,
    /// Matched against title, summary and content
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParameters {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl PageParameters {
    pub const DEFAULT_PAGE_SIZE: u64 = 20;
    pub const MAX_PAGE_SIZE: u64 = 100;

    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_size(&self) -> u64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(1, Self::MAX_PAGE_SIZE)
    }
}

/// Page of elements
#[derive(Debug, Serialize)]
pub struct PagedResult<T> {
    /// Actual content.
    content: Vec<T>,
    /// Number of the page.
    page_number: u64,
    /// Desired size of the page.
    page_size: u64,
    /// Total number of pages.
    total_pages: u64,
    /// Number of elements returned.
    elements_number: usize,
    /// Total number of elements.
    total_items: u64,
}

impl<T> PagedResult<T>
where
    T: Serialize + Debug,
{
    /// Build a Page from a vector, a number of total element matching a query, the page size and page number
    pub fn new(source: Vec<T>, total_items: u64, page_size: u64, page_number: u64) -> Self {
        let content: Vec<T> = source.into_iter().take(page_size as usize).collect();
        let elements_number = content.len();
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        PagedResult {
            content,
            page_number,
            page_size,
            total_pages,
            elements_number,
            total_items,
        }
    }

    pub fn content(&self) -> &Vec<T> {
        &self.content
    }

    pub fn page_number(&self) -> &u64 {
        &self.page_number
    }

    pub fn page_size(&self) -> &u64 {
        &self.page_size
    }

    pub fn total_pages(&self) -> &u64 {
        &self.total_pages
    }

    pub fn elements_number(&self) -> &usize {
        &self.elements_number
    }

    pub fn total_items(&self) -> &u64 {
        &self.total_items
    }
}

/// Number of articles sharing a source or a category
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CountByName {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total_articles: i64,
    pub sources: Vec<CountByName>,
    pub categories: Vec<CountByName>,
}

/// What happened to a single feed entry during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Inserted,
    /// An article with the same url is already stored
    Duplicate,
    Failed(crate::errors::EntryMappingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    /// Position of the entry in the feed
    pub position: usize,
    pub title: Option<String>,
    pub reason: String,
}

/// Counters of one committed source ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceTally {
    pub inserted: u64,
    pub duplicates: u64,
    pub failures: Vec<EntryFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Completed(SourceTally),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn inserted(&self) -> u64 {
        match &self.outcome {
            SourceOutcome::Completed(tally) => tally.inserted,
            SourceOutcome::Failed { .. } => 0,
        }
    }
}

/// Result of a full aggregation run, source by source
#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub run_id: Uuid,
    pub sources: Vec<SourceReport>,
}

impl AggregationReport {
    pub fn total_inserted(&self) -> u64 {
        self.sources.iter().map(SourceReport::inserted).sum()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|report| matches!(report.outcome, SourceOutcome::Failed { .. }))
    }
}
