use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::articles;
use crate::model::{ArticleFilter, PageParameters};
use crate::routes::ApiError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct ArticleFilterParameters {
    pub category: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParameters {
    #[serde(default)]
    pub q: String,
}

#[get("/articles")]
#[tracing::instrument(skip(app_state))]
pub async fn get_articles(
    page: web::Query<PageParameters>,
    filter: web::Query<ArticleFilterParameters>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let filter = filter.into_inner();
    let filter = ArticleFilter {
        category: filter.category,
        source: filter.source,
        ..ArticleFilter::default()
    };

    let articles =
        articles::get_articles(&app_state.pool, &filter, page.get_page(), page.get_size())
            .await?;

    Ok(HttpResponse::Ok().json(articles))
}

#[get("/search")]
#[tracing::instrument(skip(app_state))]
pub async fn search(
    search: web::Query<SearchParameters>,
    page: web::Query<PageParameters>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let articles =
        articles::search_articles(&app_state.pool, &search.q, page.get_page(), page.get_size())
            .await?;

    Ok(HttpResponse::Ok().json(articles))
}

#[get("/articles/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn get_article(
    id: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    match articles::get_article(&app_state.pool, id).await? {
        Some(article) => Ok(HttpResponse::Ok().json(article)),
        None => Err(ApiError::NotFound("article".to_owned(), id)),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_articles)
        .service(search)
        .service(get_article);
}
