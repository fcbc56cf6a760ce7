use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use models::unit_measure::UnitMeasure;

use crate::errors::ServiceError;
use crate::parse_object_id;
use crate::unit_measure::repository::UnitMeasureRepository;

/// Create/update payload; `create` requires at least a name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnitMeasureInput {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
}

impl UnitMeasureInput {
    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.name {
            if name.len() > 200 {
                return Err(ServiceError::Validation("name must be at most 200 characters".into()));
            }
        }
        if let Some(abbreviation) = &self.abbreviation {
            if abbreviation.len() > 50 {
                return Err(ServiceError::Validation("abbreviation must be at most 50 characters".into()));
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

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitMeasureResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub description: String,
    pub date: String,
    pub last_update_date: String,
}

/// Application service owning unit-measure business rules and shape
/// conversion.
pub struct UnitMeasureService<R: UnitMeasureRepository> {
    repo: Arc<R>,
}

impl<R: UnitMeasureRepository> UnitMeasureService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn create(&self, input: UnitMeasureInput) -> Result<UnitMeasureResponse, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", "create");
        input.validate_for_create()?;
        let now = Utc::now();
        let unit_measure = UnitMeasure {
            id: None,
            name: input.name.unwrap_or_default(),
            abbreviation: input.abbreviation.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            date: now,
            last_update_date: now,
        };
        let created = self.repo.insert(unit_measure).await?;
        Ok(to_response(&created))
    }

    pub async fn query_all(&self) -> Result<Vec<UnitMeasureResponse>, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", "query_all");
        let unit_measures = self.repo.query_all().await?;
        Ok(unit_measures.iter().map(to_response).collect())
    }

    pub async fn query_by_id(&self, id: &str) -> Result<UnitMeasureResponse, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", %id, "query_by_id");
        let oid = parse_object_id(id)?;
        let unit_measure = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("unit measure"))?;
        Ok(to_response(&unit_measure))
    }

    pub async fn query_by_name(&self, name: &str) -> Result<Vec<UnitMeasureResponse>, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", %name, "query_by_name");
        let unit_measures = self.repo.query_by_name(name).await?;
        Ok(unit_measures.iter().map(to_response).collect())
    }

    /// Partial update; `date` stays fixed, `last_update_date` is re-stamped.
    pub async fn update(&self, input: UnitMeasureInput, id: &str) -> Result<UnitMeasureResponse, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", %id, "update");
        input.validate()?;
        let oid = parse_object_id(id)?;
        let mut unit_measure = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("unit measure"))?;
        if let Some(name) = input.name {
            unit_measure.name = name;
        }
        if let Some(abbreviation) = input.abbreviation {
            unit_measure.abbreviation = abbreviation;
        }
        if let Some(description) = input.description {
            unit_measure.description = description;
        }
        unit_measure.last_update_date = Utc::now();
        let saved = self.repo.save(unit_measure).await?;
        Ok(to_response(&saved))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        debug!(layer = "service", entity = "unit_measure", %id, "delete");
        let oid = parse_object_id(id)?;
        if !self.repo.delete(oid).await? {
            return Err(ServiceError::not_found("unit measure"));
        }
        Ok(true)
    }
}

fn to_response(unit_measure: &UnitMeasure) -> UnitMeasureResponse {
    UnitMeasureResponse {
        id: unit_measure.id.map(|oid| oid.to_hex()).unwrap_or_default(),
        name: unit_measure.name.clone(),
        abbreviation: unit_measure.abbreviation.clone(),
        description: unit_measure.description.clone(),
        date: unit_measure.formatted_date(),
        last_update_date: unit_measure.formatted_last_update_date(),
    }
}
