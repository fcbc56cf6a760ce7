use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use service::product::{ProductInput, ProductResponse};

use crate::errors::JsonApiError;
use crate::messages;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<String>,
    pub unit_measure_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

fn require_id(id: Option<String>) -> Result<String, JsonApiError> {
    id.ok_or_else(|| JsonApiError::new(StatusCode::BAD_REQUEST, "id query parameter is required"))
}

/// 创建产品。引用的部门/计量单位先经由其所属服务校验存在后才落库；
/// 上游拒绝时原样返回其状态码与响应体。
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductResponse>), JsonApiError> {
    let created = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 查询产品：`id` 精确查找；`name`/`description` 模糊匹配；
/// `department_id`/`unit_measure_id` 按引用过滤；否则列出全部
pub async fn query_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> Result<Json<Value>, JsonApiError> {
    if let Some(id) = &q.id {
        let product = state.products.query_by_id(id).await?;
        return Ok(Json(json!(product)));
    }
    let products = if let Some(name) = &q.name {
        state.products.query_by_name(name).await?
    } else if let Some(description) = &q.description {
        state.products.query_by_description(description).await?
    } else if let Some(department_id) = &q.department_id {
        state.products.query_by_department_id(department_id).await?
    } else if let Some(unit_measure_id) = &q.unit_measure_id {
        state.products.query_by_unit_measure_id(unit_measure_id).await?
    } else {
        state.products.query_all().await?
    };
    if products.is_empty() {
        return Err(JsonApiError::new(StatusCode::NOT_FOUND, "There is no records that show."));
    }
    Ok(Json(json!(products)))
}

/// 更新指定产品（部分更新；引用字段不再重新校验）
pub async fn update_product(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductResponse>, JsonApiError> {
    let id = require_id(q.id)?;
    let updated = state.products.update(input, &id).await?;
    Ok(Json(updated))
}

/// 删除指定产品
pub async fn delete_product(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Value>, JsonApiError> {
    let id = require_id(q.id)?;
    state.products.delete(&id).await?;
    Ok(Json(json!({ "message": messages::SUCCESSFUL_DELETION_MESSAGE })))
}
