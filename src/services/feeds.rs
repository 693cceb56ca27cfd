use std::time::Duration;

use feed_rs::model::Entry;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;

use crate::errors::FetchError;
use crate::model::{ContentBlock, MediaReference, RawEntry};

const USER_AGENT: &str = concat!("news-aggregator fetcher/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used to download the feeds. Every request is bound by `timeout`.
pub fn build_client(timeout: Duration) -> reqwest::Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;

    Ok(reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .build())
}

/// Download and parse a feed, returning its entries in the order of the feed
#[tracing::instrument(skip(client))]
pub async fn fetch_entries(
    client: &ClientWithMiddleware,
    url: &str,
) -> Result<Vec<RawEntry>, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::StatusCodeError(response.status().as_u16()));
    }

    let data = response.bytes().await?;
    let feed = feed_rs::parser::parse(&data[..])?;

    Ok(feed.entries.into_iter().map(RawEntry::from).collect())
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        let link = entry
            .links
            .iter()
            .find(|link| link.rel.as_deref().map_or(true, |rel| rel == "alternate"))
            .or_else(|| entry.links.first())
            .map(|link| link.href.clone());

        let media_content = entry
            .media
            .iter()
            .flat_map(|media| media.content.iter())
            .map(|content| MediaReference {
                url: content.url.as_ref().map(|url| url.to_string()),
            })
            .collect();

        let media_thumbnails = entry
            .media
            .iter()
            .flat_map(|media| media.thumbnails.iter())
            .map(|thumbnail| MediaReference {
                url: Some(thumbnail.image.uri.clone()),
            })
            .collect();

        RawEntry {
            title: entry.title.map(|title| title.content),
            link,
            summary: entry.summary.map(|summary| summary.content),
            // feed-rs already reads RSS descriptions into the summary
            description: None,
            content: entry
                .content
                .into_iter()
                .map(|content| ContentBlock {
                    value: content.body,
                })
                .collect(),
            published: entry.published.map(|date| date.to_rfc3339()),
            updated: entry.updated.map(|date| date.to_rfc3339()),
            author: entry.authors.into_iter().next().map(|person| person.name),
            tags: entry
                .categories
                .into_iter()
                .map(|category| category.term)
                .collect(),
            media_content,
            media_thumbnails,
        }
    }
}
