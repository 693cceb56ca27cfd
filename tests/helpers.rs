#![allow(dead_code)]

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use news_aggregator::configuration::{Configuration, FeedSource};
use news_aggregator::database::init_sqlite_connection;
use news_aggregator::services::feeds::build_client;
use news_aggregator::services::fetching::Aggregator;
use news_aggregator::Pool;

pub async fn configure_database() -> Pool {
    init_sqlite_connection("sqlite::memory:").await.unwrap()
}

pub fn build_aggregator(pool: Pool, sources: Vec<FeedSource>) -> Aggregator {
    let configuration = Configuration {
        pacing: Duration::from_millis(1),
        fetch_timeout: Duration::from_secs(2),
        ..Configuration::with_sources(sources)
    };
    let client = build_client(configuration.fetch_timeout).unwrap();

    Aggregator::new(client, pool, configuration)
}

pub fn source(mock: &MockServer, name: &str, feed_path: &str) -> FeedSource {
    FeedSource::new(name, &format!("{}{}", mock.uri(), feed_path), Some("General"))
}

pub async fn serve_feed(mock: &MockServer, feed_path: &str, body: String, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .expect(expected_calls)
        .mount(mock)
        .await;
}

pub fn rss_item(title: &str, link: Option<&str>) -> String {
    let link = link
        .map(|link| format!("<link>{link}</link>"))
        .unwrap_or_default();

    format!(
        r#"<item>
            <title>{title}</title>
            {link}
            <description>&lt;p&gt;Story about {title}&lt;/p&gt;</description>
            <pubDate>Wed, 03 Aug 2022 12:00:17 +0000</pubDate>
        </item>"#
    )
}

pub fn rss_feed(items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
        <rss version="2.0">
        <channel>
          <title>Test feed</title>
          <link>https://news.example.com</link>
          <description>Test feed</description>
          {}
        </channel>
        </rss>"#,
        items.join("\n")
    )
}

/// Feed of `count` items, linking to https://news.example.com/{0..count}
pub fn numbered_feed(count: usize) -> String {
    linked_feed("https://news.example.com", count)
}

/// Feed of `count` items, linking to {base}/{0..count}
pub fn linked_feed(base: &str, count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| rss_item(&format!("Story {i}"), Some(&format!("{base}/{i}"))))
        .collect();

    rss_feed(&items)
}
