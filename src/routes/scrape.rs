use actix_web::{post, web, HttpResponse};
use serde_json::json;

use crate::routes::ApiError;
use crate::startup::AppState;

/// Run a whole aggregation and wait for it
#[post("/scrape")]
#[tracing::instrument(skip(app_state))]
pub async fn scrape(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let report = app_state.aggregator.run().await?;
    let total = report.total_inserted();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Successfully scraped {} new articles", total),
        "total": total,
        "report": report,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(scrape);
}
