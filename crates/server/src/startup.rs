use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::department::{DepartmentService, MongoDepartmentRepository};
use service::product::{
    HttpDepartmentClient, HttpUnitMeasureClient, MongoProductRepository, ProductService,
};
use service::unit_measure::{MongoUnitMeasureRepository, UnitMeasureService};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Assemble every application service against one database handle. The
/// outbound lookup clients point at the configured sibling services and
/// share the bounded request timeout.
pub fn build_state(db: &mongodb::Database, deps: &configs::DependenciesConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(deps.request_timeout_secs);
    let unit_measure_client =
        Arc::new(HttpUnitMeasureClient::new(deps.unit_measure_url.clone(), timeout)?);
    let department_client =
        Arc::new(HttpDepartmentClient::new(deps.department_url.clone(), timeout)?);

    Ok(AppState {
        departments: Arc::new(DepartmentService::new(Arc::new(MongoDepartmentRepository::new(db)))),
        unit_measures: Arc::new(UnitMeasureService::new(Arc::new(MongoUnitMeasureRepository::new(db)))),
        products: Arc::new(ProductService::new(
            Arc::new(MongoProductRepository::new(db)),
            unit_measure_client,
            department_client,
        )),
    })
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database).await?;

    let state = build_state(&db, &cfg.dependencies)?;

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, database = %cfg.database.name, "starting product management server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
