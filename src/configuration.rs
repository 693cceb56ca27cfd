use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Category of the articles of a source without any configured category
pub const DEFAULT_CATEGORY: &str = "General";

/// A named feed and the category its articles default to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, category: Option<&str>) -> Self {
        FeedSource {
            name: name.to_owned(),
            url: url.to_owned(),
            category: category.map(str::to_owned),
        }
    }

    pub fn default_category(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

/// # Aggregation configuration
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Sources, fetched in this order
    pub sources: Vec<FeedSource>,
    /// Deadline of a single feed download
    pub fetch_timeout: Duration,
    /// Pause between two consecutive sources
    pub pacing: Duration,
    pub max_entries_per_source: usize,
    pub summary_max_length: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            sources: default_sources(),
            fetch_timeout: Duration::from_secs(10),
            pacing: Duration::from_secs(1),
            max_entries_per_source: 10,
            summary_max_length: crate::services::text::DEFAULT_SUMMARY_LENGTH,
        }
    }
}

impl Configuration {
    /// Read the configuration from the environment, falling back on the defaults.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let defaults = Configuration::default();

        let sources = match var("SOURCES_FILE") {
            Ok(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigurationError::SourcesFile { path, source })?;
                parse_sources(&content)?
            }
            Err(_) => defaults.sources,
        };

        let pacing = parse_env("FETCH_PACING_MILLISECONDS", defaults.pacing.as_millis() as u64)?;

        Ok(Configuration {
            sources,
            fetch_timeout: Duration::from_secs(parse_env(
                "FETCH_TIMEOUT_SECONDS",
                defaults.fetch_timeout.as_secs(),
            )?),
            pacing: Duration::from_millis(pacing.max(1)),
            max_entries_per_source: parse_env(
                "MAX_ENTRIES_PER_SOURCE",
                defaults.max_entries_per_source,
            )?,
            summary_max_length: parse_env("SUMMARY_MAX_LENGTH", defaults.summary_max_length)?,
        })
    }

    /// Default settings, fetching only the given sources
    pub fn with_sources(sources: Vec<FeedSource>) -> Self {
        Configuration {
            sources,
            ..Configuration::default()
        }
    }
}

/// Url of the article database
pub fn database_url() -> String {
    var("DATABASE_URL").unwrap_or_else(|_| String::from("sqlite://news.db"))
}

/// Parse a JSON array of sources, keeping its order.
pub fn parse_sources(content: &str) -> Result<Vec<FeedSource>, ConfigurationError> {
    let sources: Vec<FeedSource> = serde_json::from_str(content)?;
    if sources.is_empty() {
        return Err(ConfigurationError::NoSources);
    }

    Ok(sources)
}

/// Read a variable from the environment, or use the default if it's not set
pub(crate) fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigurationError> {
    match var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "BBC News",
            "http://feeds.bbci.co.uk/news/rss.xml",
            Some("General"),
        ),
        FeedSource::new(
            "CNN",
            "http://rss.cnn.com/rss/cnn_topstories.rss",
            Some("General"),
        ),
        FeedSource::new("Reuters", "https://www.reutersagency.com/feed/", Some("General")),
        FeedSource::new(
            "The Guardian",
            "https://www.theguardian.com/world/rss",
            Some("World"),
        ),
        FeedSource::new("TechCrunch", "https://techcrunch.com/feed/", Some("Technology")),
        FeedSource::new(
            "Ars Technica",
            "http://feeds.arstechnica.com/arstechnica/index",
            Some("Technology"),
        ),
        FeedSource::new(
            "The Verge",
            "https://www.theverge.com/rss/index.xml",
            Some("Technology"),
        ),
        FeedSource::new("Hacker News", "https://hnrss.org/frontpage", Some("Technology")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_keep_their_order() {
        let sources = parse_sources(
            r#"[
                {"name": "Hacker News", "url": "https://hnrss.org/frontpage", "category": "Technology"},
                {"name": "Le Monde", "url": "https://www.lemonde.fr/rss/une.xml"}
            ]"#,
        )
        .unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "Hacker News");
        assert_eq!(sources[0].default_category(), "Technology");
        assert_eq!(sources[1].name, "Le Monde");
        assert_eq!(sources[1].default_category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn empty_source_list_is_rejected() {
        assert!(matches!(
            parse_sources("[]"),
            Err(ConfigurationError::NoSources)
        ));
        assert!(matches!(
            parse_sources("{"),
            Err(ConfigurationError::SourcesFormat(_))
        ));
    }

    #[test]
    fn blank_category_falls_back_to_default() {
        let source = FeedSource::new("CNN", "http://rss.cnn.com/rss/cnn_topstories.rss", Some("  "));

        assert_eq!(source.default_category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn default_configuration_maps_tech_outlets() {
        let configuration = Configuration::default();

        let categories = configuration
            .sources
            .iter()
            .map(|source| (source.name.as_str(), source.default_category()))
            .collect::<Vec<_>>();

        assert_eq!(categories.len(), 8);
        assert!(categories.contains(&("The Verge", "Technology")));
        assert!(categories.contains(&("The Guardian", "World")));
        assert!(categories.contains(&("BBC News", "General")));
        assert_eq!(configuration.max_entries_per_source, 10);
        assert_eq!(configuration.summary_max_length, 300);
    }
}
