use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Collection, Database};

use models::unit_measure::{UnitMeasure, COLLECTION};

use crate::errors::ServiceError;
use crate::search;

#[async_trait]
pub trait UnitMeasureRepository: Send + Sync {
    async fn query_all(&self) -> Result<Vec<UnitMeasure>, ServiceError>;
    async fn query_by_id(&self, id: ObjectId) -> Result<Option<UnitMeasure>, ServiceError>;
    async fn query_by_name(&self, name: &str) -> Result<Vec<UnitMeasure>, ServiceError>;
    async fn insert(&self, unit_measure: UnitMeasure) -> Result<UnitMeasure, ServiceError>;
    async fn save(&self, unit_measure: UnitMeasure) -> Result<UnitMeasure, ServiceError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError>;
}

/// MongoDB-backed repository implementation.
pub struct MongoUnitMeasureRepository {
    collection: Collection<UnitMeasure>,
}

impl MongoUnitMeasureRepository {
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(COLLECTION) }
    }
}

#[async_trait]
impl UnitMeasureRepository for MongoUnitMeasureRepository {
    async fn query_all(&self) -> Result<Vec<UnitMeasure>, ServiceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn query_by_id(&self, id: ObjectId) -> Result<Option<UnitMeasure>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn query_by_name(&self, name: &str) -> Result<Vec<UnitMeasure>, ServiceError> {
        let cursor = self
            .collection
            .find(search::icontains("name", name))
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn insert(&self, mut unit_measure: UnitMeasure) -> Result<UnitMeasure, ServiceError> {
        let res = self
            .collection
            .insert_one(&unit_measure)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        unit_measure.id = res.inserted_id.as_object_id();
        Ok(unit_measure)
    }

    async fn save(&self, unit_measure: UnitMeasure) -> Result<UnitMeasure, ServiceError> {
        let id = unit_measure.id.ok_or_else(|| ServiceError::not_found("unit measure"))?;
        let res = self
            .collection
            .replace_one(doc! { "_id": id }, &unit_measure)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.matched_count == 0 {
            return Err(ServiceError::not_found("unit measure"));
        }
        Ok(unit_measure)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError> {
        let res = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.deleted_count > 0)
    }
}
