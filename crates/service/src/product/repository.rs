use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Collection, Database};

use models::product::{Product, COLLECTION};

use crate::errors::ServiceError;
use crate::search;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn query_all(&self) -> Result<Vec<Product>, ServiceError>;
    async fn query_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError>;
    async fn query_by_name(&self, name: &str) -> Result<Vec<Product>, ServiceError>;
    async fn query_by_description(&self, description: &str) -> Result<Vec<Product>, ServiceError>;
    async fn query_by_department_id(&self, id: &str) -> Result<Vec<Product>, ServiceError>;
    async fn query_by_unit_measure_id(&self, id: &str) -> Result<Vec<Product>, ServiceError>;
    async fn insert(&self, product: Product) -> Result<Product, ServiceError>;
    async fn save(&self, product: Product) -> Result<Product, ServiceError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError>;
}

/// MongoDB-backed repository implementation. Reference fields are stored and
/// matched as plain strings; only the `_id` lookups use the native id type.
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(COLLECTION) }
    }

    async fn find_all(&self, filter: mongodb::bson::Document) -> Result<Vec<Product>, ServiceError> {
        let cursor = self
            .collection
            .find(filter)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        cursor.try_collect().await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn query_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.find_all(doc! {}).await
    }

    async fn query_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn query_by_name(&self, name: &str) -> Result<Vec<Product>, ServiceError> {
        self.find_all(search::icontains("name", name)).await
    }

    async fn query_by_description(&self, description: &str) -> Result<Vec<Product>, ServiceError> {
        self.find_all(search::icontains("description", description)).await
    }

    async fn query_by_department_id(&self, id: &str) -> Result<Vec<Product>, ServiceError> {
        self.find_all(doc! { "department_id": id }).await
    }

    async fn query_by_unit_measure_id(&self, id: &str) -> Result<Vec<Product>, ServiceError> {
        self.find_all(doc! { "unit_measure_id": id }).await
    }

    async fn insert(&self, mut product: Product) -> Result<Product, ServiceError> {
        let res = self
            .collection
            .insert_one(&product)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        product.id = res.inserted_id.as_object_id();
        Ok(product)
    }

    async fn save(&self, product: Product) -> Result<Product, ServiceError> {
        let id = product.id.ok_or_else(|| ServiceError::not_found("product"))?;
        let res = self
            .collection
            .replace_one(doc! { "_id": id }, &product)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.matched_count == 0 {
            return Err(ServiceError::not_found("product"));
        }
        Ok(product)
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
