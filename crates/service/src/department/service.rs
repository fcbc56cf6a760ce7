use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use models::department::Department;

use crate::department::repository::DepartmentRepository;
use crate::errors::ServiceError;
use crate::parse_object_id;

/// Create/update payload. Every field is optional so the same shape serves
/// partial updates; `create` enforces what must actually be present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DepartmentInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DepartmentInput {
    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.name {
            if name.len() > 200 {
                return Err(ServiceError::Validation("name must be at most 200 characters".into()));
            }
        }
        if let Some(description) = &self.description {
            if description.len() > 250 {
                return Err(ServiceError::Validation("description must be at most 250 characters".into()));
            }
        }
        Ok(())
    }

    fn validate_for_create(&self) -> Result<(), ServiceError> {
        self.validate()?;
        match &self.name {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(ServiceError::Validation("name is required".into())),
        }
    }
}

/// Response representation: id stringified, timestamps rendered as fixed
/// UTC strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub last_update_date: String,
}

/// Application service owning department business rules and shape conversion.
pub struct DepartmentService<R: DepartmentRepository> {
    repo: Arc<R>,
}

impl<R: DepartmentRepository> DepartmentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn create(&self, input: DepartmentInput) -> Result<DepartmentResponse, ServiceError> {
        debug!(layer = "service", entity = "department", "create");
        input.validate_for_create()?;
        let now = Utc::now();
        let department = Department {
            id: None,
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            date: now,
            last_update_date: now,
        };
        let created = self.repo.insert(department).await?;
        Ok(to_response(&created))
    }

    pub async fn query_all(&self) -> Result<Vec<DepartmentResponse>, ServiceError> {
        debug!(layer = "service", entity = "department", "query_all");
        let departments = self.repo.query_all().await?;
        Ok(departments.iter().map(to_response).collect())
    }

    pub async fn query_by_id(&self, id: &str) -> Result<DepartmentResponse, ServiceError> {
        debug!(layer = "service", entity = "department", %id, "query_by_id");
        let oid = parse_object_id(id)?;
        let department = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("department"))?;
        Ok(to_response(&department))
    }

    pub async fn query_by_name(&self, name: &str) -> Result<Vec<DepartmentResponse>, ServiceError> {
        debug!(layer = "service", entity = "department", %name, "query_by_name");
        let departments = self.repo.query_by_name(name).await?;
        Ok(departments.iter().map(to_response).collect())
    }

    /// Partial update: only fields present in the input overwrite the stored
    /// values; `date` is never touched after the first write.
    pub async fn update(&self, input: DepartmentInput, id: &str) -> Result<DepartmentResponse, ServiceError> {
        debug!(layer = "service", entity = "department", %id, "update");
        input.validate()?;
        let oid = parse_object_id(id)?;
        let mut department = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("department"))?;
        if let Some(name) = input.name {
            department.name = name;
        }
        if let Some(description) = input.description {
            department.description = description;
        }
        department.last_update_date = Utc::now();
        let saved = self.repo.save(department).await?;
        Ok(to_response(&saved))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        debug!(layer = "service", entity = "department", %id, "delete");
        let oid = parse_object_id(id)?;
        if !self.repo.delete(oid).await? {
            return Err(ServiceError::not_found("department"));
        }
        Ok(true)
    }
}

fn to_response(department: &Department) -> DepartmentResponse {
    DepartmentResponse {
        id: department.id.map(|oid| oid.to_hex()).unwrap_or_default(),
        name: department.name.clone(),
        description: department.description.clone(),
        date: department.formatted_date(),
        last_update_date: department.formatted_last_update_date(),
    }
}
