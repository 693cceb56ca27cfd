use std::net::TcpListener;

use actix_governor::governor::middleware::StateInformationMiddleware;
use actix_governor::{Governor, GovernorConfig, PeerIpKeyExtractor};
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};

use crate::routes;
use crate::services::fetching::Aggregator;
use crate::Pool;

pub struct AppState {
    pub pool: Pool,
    pub aggregator: Aggregator,
}

pub async fn startup(
    app_state: AppState,
    governor_conf: GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>,
    listener: TcpListener,
) -> std::io::Result<()> {
    let app_state = Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(app_state.clone())
            .service(
                web::scope("/api/v1")
                    .wrap(Governor::new(&governor_conf))
                    .configure(routes::configure),
            )
    })
    .listen(listener)?
    .run()
    .await
}
