use actix_web::{get, web, HttpResponse, ResponseError};
use serde_json::json;

use crate::errors::AggregationError;
use crate::DbError;

pub mod articles;
pub mod scrape;
pub mod stats;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Object not found")]
    NotFound(String, i64),
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbError),
    #[error("Aggregation error: {0}")]
    AggregationError(#[from] AggregationError),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::NotFound(object_type, id) => HttpResponse::NotFound().json(json!({
                "type": "/problem/not-found",
                "title": "Object not found",
                "status": 404,
                "detail": format!("Object of type {} with id {} was not found", object_type, id)
            })),
            ApiError::DatabaseError(_) => HttpResponse::InternalServerError().json(json!({
                "type": "/problem/database",
                "title": "Error with the database",
                "status": 500,
                "detail": "Unexpected error with the database"
            })),
            ApiError::AggregationError(error) => HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": format!("Error during scraping: {}", error)
            })),
        }
    }
}

#[get("/ping")]
#[tracing::instrument]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ping)
        .configure(articles::configure)
        .configure(stats::configure)
        .configure(scrape::configure);
}
