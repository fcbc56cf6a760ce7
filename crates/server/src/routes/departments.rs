use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use service::department::{DepartmentInput, DepartmentResponse};

use crate::errors::JsonApiError;
use crate::messages;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct DepartmentQuery {
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

/// 创建部门
pub async fn create_department(
    State(state): State<AppState>,
    Json(input): Json<DepartmentInput>,
) -> Result<Json<DepartmentResponse>, JsonApiError> {
    let created = state.departments.create(input).await?;
    Ok(Json(created))
}

/// 查询部门：`id` 精确查找，`name` 模糊匹配，否则列出全部
pub async fn query_departments(
    State(state): State<AppState>,
    Query(q): Query<DepartmentQuery>,
) -> Result<Json<Value>, JsonApiError> {
    if let Some(id) = &q.id {
        let department = state.departments.query_by_id(id).await?;
        return Ok(Json(json!(department)));
    }
    let departments = if let Some(name) = &q.name {
        state.departments.query_by_name(name).await?
    } else {
        state.departments.query_all().await?
    };
    if departments.is_empty() {
        return Err(JsonApiError::new(StatusCode::NOT_FOUND, "There are no records that show."));
    }
    Ok(Json(json!(departments)))
}

/// 更新指定部门（部分更新）
pub async fn update_department(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    Json(input): Json<DepartmentInput>,
) -> Result<Json<DepartmentResponse>, JsonApiError> {
    let id = require_id(q.id)?;
    let updated = state.departments.update(input, &id).await?;
    Ok(Json(updated))
}

/// 删除指定部门
pub async fn delete_department(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Value>, JsonApiError> {
    let id = require_id(q.id)?;
    state.departments.delete(&id).await?;
    // The capitalized key is the department endpoint's observed contract.
    Ok(Json(json!({ "Message": messages::SUCCESSFUL_DELETION_MESSAGE })))
}
