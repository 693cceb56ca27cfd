use actix_web::{get, web, HttpResponse};

use crate::articles::get_statistics;
use crate::routes::ApiError;
use crate::startup::AppState;

#[get("/stats")]
#[tracing::instrument(skip(app_state))]
pub async fn stats(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let statistics = get_statistics(&app_state.pool).await?;
    Ok(HttpResponse::Ok().json(statistics))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stats);
}
