use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::department::{DepartmentService, MongoDepartmentRepository};
use service::product::{HttpDepartmentClient, HttpUnitMeasureClient, MongoProductRepository, ProductService};
use service::unit_measure::{MongoUnitMeasureRepository, UnitMeasureService};

pub mod departments;
pub mod products;
pub mod unit_measures;

/// Shared handler state: one application service per entity, assembled once
/// at startup with its concrete repository and outbound clients.
#[derive(Clone)]
pub struct AppState {
    pub departments: Arc<DepartmentService<MongoDepartmentRepository>>,
    pub unit_measures: Arc<UnitMeasureService<MongoUnitMeasureRepository>>,
    pub products:
        Arc<ProductService<MongoProductRepository, HttpUnitMeasureClient, HttpDepartmentClient>>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/departments", get(departments::query_departments))
        .route("/department/create", post(departments::create_department))
        .route("/departments/update", put(departments::update_department))
        .route("/departments/delete", delete(departments::delete_department))
        .route("/unitmeasure", get(unit_measures::query_unit_measures))
        .route("/unitmeasure/create", post(unit_measures::create_unit_measure))
        .route("/unitmeasure/update", put(unit_measures::update_unit_measure))
        .route("/unitmeasure/delete", delete(unit_measures::delete_unit_measure))
        .route("/products", get(products::query_products))
        .route("/product/create", post(products::create_product))
        .route("/product/update", put(products::update_product))
        .route("/product/delete", delete(products::delete_product))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 请求到达时打点
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
