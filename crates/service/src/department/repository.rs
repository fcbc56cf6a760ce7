use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Collection, Database};

use models::department::{Department, COLLECTION};

use crate::errors::ServiceError;
use crate::search;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn query_all(&self) -> Result<Vec<Department>, ServiceError>;
    async fn query_by_id(&self, id: ObjectId) -> Result<Option<Department>, ServiceError>;
    async fn query_by_name(&self, name: &str) -> Result<Vec<Department>, ServiceError>;
    async fn insert(&self, department: Department) -> Result<Department, ServiceError>;
    async fn save(&self, department: Department) -> Result<Department, ServiceError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError>;
}

/// MongoDB-backed repository implementation.
pub struct MongoDepartmentRepository {
    collection: Collection<Department>,
}

impl MongoDepartmentRepository {
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(COLLECTION) }
    }
}

#[async_trait]
impl DepartmentRepository for MongoDepartmentRepository {
    async fn query_all(&self) -> Result<Vec<Department>, ServiceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn query_by_id(&self, id: ObjectId) -> Result<Option<Department>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn query_by_name(&self, name: &str) -> Result<Vec<Department>, ServiceError> {
        let cursor = self
            .collection
            .find(search::icontains("name", name))
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn insert(&self, mut department: Department) -> Result<Department, ServiceError> {
        let res = self
            .collection
            .insert_one(&department)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        department.id = res.inserted_id.as_object_id();
        Ok(department)
    }

    async fn save(&self, department: Department) -> Result<Department, ServiceError> {
        let id = department.id.ok_or_else(|| ServiceError::not_found("department"))?;
        let res = self
            .collection
            .replace_one(doc! { "_id": id }, &department)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.matched_count == 0 {
            return Err(ServiceError::not_found("department"));
        }
        Ok(department)
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
