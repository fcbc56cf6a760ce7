use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use service::unit_measure::{UnitMeasureInput, UnitMeasureResponse};

use crate::errors::JsonApiError;
use crate::messages;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct UnitMeasureQuery {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

fn require_id(id: Option<String>) -> Result<String, JsonApiError> {
    id.ok_or_else(|| JsonApiError::new(StatusCode::BAD_REQUEST, "id query parameter is required"))
}

/// 创建计量单位
pub async fn create_unit_measure(
    State(state): State<AppState>,
    Json(input): Json<UnitMeasureInput>,
) -> Result<Json<UnitMeasureResponse>, JsonApiError> {
    let created = state.unit_measures.create(input).await?;
    Ok(Json(created))
}

/// 查询计量单位：`id` 精确查找，`name` 模糊匹配，否则列出全部
pub async fn query_unit_measures(
    State(state): State<AppState>,
    Query(q): Query<UnitMeasureQuery>,
) -> Result<Json<Value>, JsonApiError> {
    if let Some(id) = &q.id {
        let unit_measure = state.unit_measures.query_by_id(id).await?;
        return Ok(Json(json!(unit_measure)));
    }
    if let Some(name) = &q.name {
        let unit_measures = state.unit_measures.query_by_name(name).await?;
        if unit_measures.is_empty() {
            return Err(JsonApiError::new(
                StatusCode::NOT_FOUND,
                "No unit measures found with the given name.",
            ));
        }
        return Ok(Json(json!(unit_measures)));
    }
    let unit_measures = state.unit_measures.query_all().await?;
    if unit_measures.is_empty() {
        return Err(JsonApiError::new(StatusCode::NOT_FOUND, "No records found"));
    }
    Ok(Json(json!(unit_measures)))
}

/// 更新指定计量单位（部分更新）
pub async fn update_unit_measure(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    Json(input): Json<UnitMeasureInput>,
) -> Result<Json<UnitMeasureResponse>, JsonApiError> {
    let id = require_id(q.id)?;
    let updated = state.unit_measures.update(input, &id).await?;
    Ok(Json(updated))
}

/// 删除指定计量单位
pub async fn delete_unit_measure(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Value>, JsonApiError> {
    let id = require_id(q.id)?;
    state.unit_measures.delete(&id).await?;
    Ok(Json(json!({ "message": messages::SUCCESSFUL_DELETION_MESSAGE })))
}
