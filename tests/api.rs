use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, web, App};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use speculoos::prelude::*;
use wiremock::MockServer;

use news_aggregator::articles::insert_article;
use news_aggregator::model::NewArticle;
use news_aggregator::routes;
use news_aggregator::startup::AppState;
use news_aggregator::Pool;

use helpers::*;

mod helpers;

fn article(url: &str, title: &str, source: &str, category: &str, day: u32) -> NewArticle {
    NewArticle {
        title: title.to_owned(),
        url: url.to_owned(),
        summary: format!("Summary of {title}"),
        content: format!("Content of {title}"),
        source: source.to_owned(),
        category: category.to_owned(),
        author: "Unknown".to_owned(),
        publication_date: Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap(),
        image_url: None,
    }
}

async fn seeded_database() -> Pool {
    let db = configure_database().await;
    for article in [
        article("https://a/1", "Rust 2024 released", "Hacker News", "Technology", 3),
        article("https://a/2", "Elections in Europe", "The Guardian", "World", 5),
        article("https://a/3", "Markets rally", "Reuters", "General", 1),
    ] {
        insert_article(&db, &article).await.unwrap();
    }

    db
}

macro_rules! app {
    ($db:expr, $sources:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new(AppState {
                    pool: $db.clone(),
                    aggregator: build_aggregator($db.clone(), $sources),
                }))
                .service(web::scope("/api/v1").configure(routes::configure)),
        )
        .await
    };
}

#[actix_web::test]
async fn list_articles() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?per_page=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_that(&body["total_items"]).is_equal_to(Value::from(3));
    assert_that(&body["total_pages"]).is_equal_to(Value::from(2));
    assert_that(&body["page_number"]).is_equal_to(Value::from(1));
    assert_that(&body["content"][0]["url"]).is_equal_to(Value::from("https://a/2"));
    assert_that(&body["content"][1]["url"]).is_equal_to(Value::from("https://a/1"));
}

#[actix_web::test]
async fn huge_page_number_is_an_empty_page() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?page=1000000000000000000&per_page=100")
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_that(&response.status()).is_equal_to(StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_that(&body["elements_number"]).is_equal_to(Value::from(0));
    assert_that(&body["total_items"]).is_equal_to(Value::from(3));
}

#[actix_web::test]
async fn filter_articles() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?category=TECH")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_that(&body["total_items"]).is_equal_to(Value::from(1));
    assert_that(&body["content"][0]["source"]).is_equal_to(Value::from("Hacker News"));

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?source=reuters")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_that(&body["total_items"]).is_equal_to(Value::from(1));
    assert_that(&body["content"][0]["title"]).is_equal_to(Value::from("Markets rally"));
}

#[actix_web::test]
async fn search_articles() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get()
        .uri("/api/v1/search?q=europe")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_that(&body["total_items"]).is_equal_to(Value::from(1));

    let req = test::TestRequest::get().uri("/api/v1/search").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_that(&body["total_items"]).is_equal_to(Value::from(3));
}

#[actix_web::test]
async fn article_detail() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get().uri("/api/v1/articles/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_that(&body["url"]).is_equal_to(Value::from("https://a/1"));
    assert_that(&body["publication_date"].is_string()).is_true();

    let req = test::TestRequest::get()
        .uri("/api/v1/articles/42")
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_that(&response.status()).is_equal_to(StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(response).await;
    assert_that(&body["type"]).is_equal_to(Value::from("/problem/not-found"));
}

#[actix_web::test]
async fn statistics() {
    let db = seeded_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_that(&body["total_articles"]).is_equal_to(Value::from(3));
    assert_that(&body["sources"].as_array().map(Vec::len)).is_equal_to(Some(3));
    assert_that(&body["categories"].as_array().map(Vec::len)).is_equal_to(Some(3));
}

#[actix_web::test]
async fn ping() {
    let db = configure_database().await;
    let app = app!(db, vec![]);

    let req = test::TestRequest::get().uri("/api/v1/ping").to_request();
    let response = test::call_service(&app, req).await;

    assert!(response.status().is_success());
}

#[actix_web::test]
async fn scrape_reports_new_articles() {
    let mock = MockServer::start().await;
    serve_feed(&mock, "/feed", numbered_feed(2), 1).await;
    let db = configure_database().await;
    let app = app!(db, vec![source(&mock, "Test", "/feed")]);

    let req = test::TestRequest::post().uri("/api/v1/scrape").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_that(&body["success"]).is_equal_to(Value::from(true));
    assert_that(&body["total"]).is_equal_to(Value::from(2));
    assert_that(&body["message"]).is_equal_to(Value::from("Successfully scraped 2 new articles"));
    assert_that(&body["report"]["sources"][0]["status"]).is_equal_to(Value::from("completed"));
    assert_that(&body["report"]["sources"][0]["inserted"]).is_equal_to(Value::from(2));
}

#[actix_web::test]
async fn scrape_fails_without_store() {
    let db = configure_database().await;
    let app = app!(db, vec![]);
    db.close().await;

    let req = test::TestRequest::post().uri("/api/v1/scrape").to_request();
    let response = test::call_service(&app, req).await;

    assert_that(&response.status()).is_equal_to(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(response).await;
    assert_that(&body["success"]).is_equal_to(Value::from(false));
}
