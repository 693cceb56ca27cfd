use chrono::{DateTime, Utc};

use crate::configuration::FeedSource;
use crate::model::{NewArticle, RawEntry};
use crate::services::dates::parse_date;
use crate::services::text::{clean_html, extract_summary};

pub const NO_TITLE: &str = "No Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Create an article from a feed entry of the given source.
///
/// Every field has a fallback, so this never fails. An entry without link is mapped with an
/// empty url; it's up to the caller to refuse it before storing it.
pub fn map_entry(
    entry: &RawEntry,
    source: &FeedSource,
    now: DateTime<Utc>,
    summary_max_length: usize,
) -> NewArticle {
    let title = text_or(entry.title.as_deref(), NO_TITLE);
    let url = entry.link.as_deref().map(str::trim).unwrap_or_default();

    let raw_summary = first_present(&[entry.summary.as_deref(), entry.description.as_deref()]);
    let summary = extract_summary(raw_summary.unwrap_or_default(), summary_max_length);

    let content = entry
        .content
        .first()
        .and_then(|block| block.value.as_deref())
        .filter(|value| !value.trim().is_empty())
        .map(clean_html)
        .unwrap_or_else(|| clean_html(&summary));

    let publication_date = parse_date(
        first_present(&[entry.published.as_deref(), entry.updated.as_deref()]),
        now,
    );

    let author = text_or(entry.author.as_deref(), UNKNOWN_AUTHOR);

    let category = entry
        .tags
        .first()
        .map(|tag| clean_html(tag))
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| source.default_category().to_owned());

    let image_url = entry
        .media_content
        .iter()
        .chain(entry.media_thumbnails.iter())
        .find_map(|media| media.url.as_deref().map(str::trim).filter(|url| !url.is_empty()))
        .map(str::to_owned);

    NewArticle {
        title,
        url: url.to_owned(),
        summary,
        content,
        source: source.name.clone(),
        category,
        author,
        publication_date,
        image_url,
    }
}

/// Plain text of an optional field, or the fallback if there's nothing left once cleaned
fn text_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(clean_html)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.trim().is_empty())
}
