use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use models::product::Product;

use crate::errors::ServiceError;
use crate::parse_object_id;
use crate::product::clients::{DepartmentLookup, UnitMeasureLookup};
use crate::product::repository::ProductRepository;

/// Create/update payload. All fields optional: `create` fills defaults for
/// absent ones, `update` only overwrites what is present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub url_picture: Option<String>,
    pub location: Option<String>,
    pub lot_flag: Option<bool>,
    pub price_lot_flag: Option<bool>,
    pub alert_minimum_stock_flag: Option<bool>,
    pub alert_expiration_date_flag: Option<bool>,
    pub comments: Option<String>,
    pub department_id: Option<String>,
    pub unit_measure_id: Option<String>,
}

impl ProductInput {
    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.name {
            if name.len() > 100 {
                return Err(ServiceError::Validation("name must be at most 100 characters".into()));
            }
        }
        for (field, value) in [
            ("description", &self.description),
            ("url_picture", &self.url_picture),
            ("location", &self.location),
            ("comments", &self.comments),
        ] {
            if let Some(v) = value {
                if v.len() > 250 {
                    return Err(ServiceError::Validation(format!("{field} must be at most 250 characters")));
                }
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(ServiceError::Validation("quantity must not be negative".into()));
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
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub url_picture: String,
    pub location: String,
    pub lot_flag: bool,
    pub price_lot_flag: bool,
    pub alert_minimum_stock_flag: bool,
    pub alert_expiration_date_flag: bool,
    pub comments: String,
    pub date: String,
    pub last_update: String,
    pub department_id: String,
    pub unit_measure_id: String,
}

/// Application service for products. On creation it confirms any referenced
/// department / unit measure still exists in its owning service before the
/// insert; the checks are sequential, unretried and not transactional with
/// the insert (a reference deleted in between is not caught).
pub struct ProductService<R, U, D>
where
    R: ProductRepository,
    U: UnitMeasureLookup,
    D: DepartmentLookup,
{
    repo: Arc<R>,
    unit_measures: Arc<U>,
    departments: Arc<D>,
}

impl<R, U, D> ProductService<R, U, D>
where
    R: ProductRepository,
    U: UnitMeasureLookup,
    D: DepartmentLookup,
{
    pub fn new(repo: Arc<R>, unit_measures: Arc<U>, departments: Arc<D>) -> Self {
        Self { repo, unit_measures, departments }
    }

    /// Create a product, verifying foreign references first. The unit
    /// measure is checked before the department; the first failing lookup
    /// aborts with the upstream status and body, and nothing is persisted.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<ProductResponse, ServiceError> {
        input.validate_for_create()?;

        if let Some(unit_measure_id) = reference(&input.unit_measure_id) {
            let resp = self.unit_measures.query_by_id(unit_measure_id).await?;
            if resp.status != 200 {
                warn!(
                    dependency = "unit_measure",
                    status = resp.status,
                    "reference lookup rejected, aborting create"
                );
                return Err(ServiceError::Dependency { code: resp.status, body: resp.body });
            }
        }
        if let Some(department_id) = reference(&input.department_id) {
            let resp = self.departments.query_by_id(department_id).await?;
            // The reference department endpoint answers 201 on a successful
            // lookup; the corrected convention is 200. Accept both.
            if resp.status != 200 && resp.status != 201 {
                warn!(
                    dependency = "department",
                    status = resp.status,
                    "reference lookup rejected, aborting create"
                );
                return Err(ServiceError::Dependency { code: resp.status, body: resp.body });
            }
        }

        let now = Utc::now();
        let product = Product {
            id: None,
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            quantity: input.quantity.unwrap_or(0),
            url_picture: input.url_picture.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            lot_flag: input.lot_flag.unwrap_or(false),
            price_lot_flag: input.price_lot_flag.unwrap_or(false),
            alert_minimum_stock_flag: input.alert_minimum_stock_flag.unwrap_or(false),
            alert_expiration_date_flag: input.alert_expiration_date_flag.unwrap_or(false),
            comments: input.comments.unwrap_or_default(),
            date: now,
            last_update: now,
            department_id: input.department_id.unwrap_or_default(),
            unit_measure_id: input.unit_measure_id.unwrap_or_default(),
        };
        let created = self.repo.insert(product).await?;
        Ok(to_response(&created))
    }

    pub async fn query_all(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        debug!(layer = "service", entity = "product", "query_all");
        let products = self.repo.query_all().await?;
        Ok(products.iter().map(to_response).collect())
    }

    pub async fn query_by_id(&self, id: &str) -> Result<ProductResponse, ServiceError> {
        debug!(layer = "service", entity = "product", %id, "query_by_id");
        let oid = parse_object_id(id)?;
        let product = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        Ok(to_response(&product))
    }

    pub async fn query_by_name(&self, name: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        debug!(layer = "service", entity = "product", %name, "query_by_name");
        let products = self.repo.query_by_name(name).await?;
        Ok(products.iter().map(to_response).collect())
    }

    pub async fn query_by_description(&self, description: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        debug!(layer = "service", entity = "product", "query_by_description");
        let products = self.repo.query_by_description(description).await?;
        Ok(products.iter().map(to_response).collect())
    }

    /// Reference filters still require a well-formed id; the stored value is
    /// matched as the canonical lowercase hex string.
    pub async fn query_by_department_id(&self, id: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        debug!(layer = "service", entity = "product", %id, "query_by_department_id");
        let oid = parse_object_id(id)?;
        let products = self.repo.query_by_department_id(&oid.to_hex()).await?;
        Ok(products.iter().map(to_response).collect())
    }

    pub async fn query_by_unit_measure_id(&self, id: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        debug!(layer = "service", entity = "product", %id, "query_by_unit_measure_id");
        let oid = parse_object_id(id)?;
        let products = self.repo.query_by_unit_measure_id(&oid.to_hex()).await?;
        Ok(products.iter().map(to_response).collect())
    }

    /// Partial update. References are overwritten verbatim without a fresh
    /// existence check, matching the creation-only validation contract.
    pub async fn update(&self, input: ProductInput, id: &str) -> Result<ProductResponse, ServiceError> {
        debug!(layer = "service", entity = "product", %id, "update");
        input.validate()?;
        let oid = parse_object_id(id)?;
        let mut product = self
            .repo
            .query_by_id(oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(description) = input.description {
            product.description = description;
        }
        if let Some(quantity) = input.quantity {
            product.quantity = quantity;
        }
        if let Some(url_picture) = input.url_picture {
            product.url_picture = url_picture;
        }
        if let Some(location) = input.location {
            product.location = location;
        }
        if let Some(lot_flag) = input.lot_flag {
            product.lot_flag = lot_flag;
        }
        if let Some(price_lot_flag) = input.price_lot_flag {
            product.price_lot_flag = price_lot_flag;
        }
        if let Some(alert_minimum_stock_flag) = input.alert_minimum_stock_flag {
            product.alert_minimum_stock_flag = alert_minimum_stock_flag;
        }
        if let Some(alert_expiration_date_flag) = input.alert_expiration_date_flag {
            product.alert_expiration_date_flag = alert_expiration_date_flag;
        }
        if let Some(comments) = input.comments {
            product.comments = comments;
        }
        if let Some(department_id) = input.department_id {
            product.department_id = department_id;
        }
        if let Some(unit_measure_id) = input.unit_measure_id {
            product.unit_measure_id = unit_measure_id;
        }
        product.last_update = Utc::now();
        let saved = self.repo.save(product).await?;
        Ok(to_response(&saved))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        debug!(layer = "service", entity = "product", %id, "delete");
        let oid = parse_object_id(id)?;
        if !self.repo.delete(oid).await? {
            return Err(ServiceError::not_found("product"));
        }
        Ok(true)
    }
}

/// A reference participates in validation only when present and non-empty.
fn reference(id: &Option<String>) -> Option<&str> {
    match id.as_deref() {
        Some(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn to_response(product: &Product) -> ProductResponse {
    ProductResponse {
        id: product.id.map(|oid| oid.to_hex()).unwrap_or_default(),
        name: product.name.clone(),
        description: product.description.clone(),
        quantity: product.quantity,
        url_picture: product.url_picture.clone(),
        location: product.location.clone(),
        lot_flag: product.lot_flag,
        price_lot_flag: product.price_lot_flag,
        alert_minimum_stock_flag: product.alert_minimum_stock_flag,
        alert_expiration_date_flag: product.alert_expiration_date_flag,
        comments: product.comments.clone(),
        date: product.formatted_date(),
        last_update: product.formatted_last_update(),
        department_id: product.department_id.clone(),
        unit_measure_id: product.unit_measure_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::clients::LookupResponse;
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRepo {
        docs: Mutex<HashMap<ObjectId, Product>>,
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl ProductRepository for FakeRepo {
        async fn query_all(&self) -> Result<Vec<Product>, ServiceError> {
            Ok(self.docs.lock().unwrap().values().cloned().collect())
        }

        async fn query_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError> {
            Ok(self.docs.lock().unwrap().get(&id).cloned())
        }

        async fn query_by_name(&self, name: &str) -> Result<Vec<Product>, ServiceError> {
            let needle = name.to_lowercase();
            Ok(self
                .docs
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn query_by_description(&self, description: &str) -> Result<Vec<Product>, ServiceError> {
            let needle = description.to_lowercase();
            Ok(self
                .docs
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.description.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn query_by_department_id(&self, id: &str) -> Result<Vec<Product>, ServiceError> {
            Ok(self
                .docs
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.department_id == id)
                .cloned()
                .collect())
        }

        async fn query_by_unit_measure_id(&self, id: &str) -> Result<Vec<Product>, ServiceError> {
            Ok(self
                .docs
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.unit_measure_id == id)
                .cloned()
                .collect())
        }

        async fn insert(&self, mut product: Product) -> Result<Product, ServiceError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            let id = ObjectId::new();
            product.id = Some(id);
            self.docs.lock().unwrap().insert(id, product.clone());
            Ok(product)
        }

        async fn save(&self, product: Product) -> Result<Product, ServiceError> {
            let id = product.id.ok_or_else(|| ServiceError::not_found("product"))?;
            let mut docs = self.docs.lock().unwrap();
            if !docs.contains_key(&id) {
                return Err(ServiceError::not_found("product"));
            }
            docs.insert(id, product.clone());
            Ok(product)
        }

        async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError> {
            Ok(self.docs.lock().unwrap().remove(&id).is_some())
        }
    }

    /// Scripted stand-in for a dependency service: answers every lookup with
    /// one fixed status/body, or fails as unreachable.
    struct ScriptedLookup {
        status: u16,
        body: String,
        unreachable: bool,
        calls: AtomicUsize,
    }

    impl ScriptedLookup {
        fn answering(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self { status, body: body.into(), unreachable: false, calls: AtomicUsize::new(0) })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self { status: 0, body: String::new(), unreachable: true, calls: AtomicUsize::new(0) })
        }

        fn answer(&self) -> Result<LookupResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                return Err(ServiceError::Unavailable("connection refused".into()));
            }
            Ok(LookupResponse { status: self.status, body: self.body.clone() })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UnitMeasureLookup for ScriptedLookup {
        async fn query_by_id(&self, _id: &str) -> Result<LookupResponse, ServiceError> {
            self.answer()
        }
    }

    #[async_trait]
    impl DepartmentLookup for ScriptedLookup {
        async fn query_by_id(&self, _id: &str) -> Result<LookupResponse, ServiceError> {
            self.answer()
        }
    }

    struct Harness {
        repo: Arc<FakeRepo>,
        unit_measures: Arc<ScriptedLookup>,
        departments: Arc<ScriptedLookup>,
        svc: ProductService<FakeRepo, ScriptedLookup, ScriptedLookup>,
    }

    fn harness(unit_measures: Arc<ScriptedLookup>, departments: Arc<ScriptedLookup>) -> Harness {
        let repo = Arc::new(FakeRepo::default());
        let svc = ProductService::new(repo.clone(), unit_measures.clone(), departments.clone());
        Harness { repo, unit_measures, departments, svc }
    }

    fn base_input() -> ProductInput {
        ProductInput {
            name: Some("Bolt M6".into()),
            description: Some("Hex bolt".into()),
            quantity: Some(40),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_without_references_skips_lookups() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let created = h.svc.create(base_input()).await.expect("create");
        assert_eq!(created.quantity, 40);
        assert_eq!(h.unit_measures.calls(), 0);
        assert_eq!(h.departments.calls(), 0);
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unit_measure_rejection_aborts_creation_with_upstream_answer() {
        let body = r#"{"error": "No unit measures found with the given id."}"#;
        let h = harness(ScriptedLookup::answering(404, body), ScriptedLookup::answering(201, "{}"));
        let mut input = base_input();
        input.unit_measure_id = Some(ObjectId::new().to_hex());
        input.department_id = Some(ObjectId::new().to_hex());

        let err = h.svc.create(input).await.unwrap_err();
        match err {
            ServiceError::Dependency { code, body: b } => {
                assert_eq!(code, 404);
                assert_eq!(b, body);
            }
            other => panic!("expected Dependency, got {other:?}"),
        }
        // Nothing persisted, department never consulted.
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 0);
        assert_eq!(h.departments.calls(), 0);
    }

    #[tokio::test]
    async fn unit_measure_must_answer_exactly_200() {
        let h = harness(ScriptedLookup::answering(201, "created?"), ScriptedLookup::answering(200, "{}"));
        let mut input = base_input();
        input.unit_measure_id = Some(ObjectId::new().to_hex());

        let err = h.svc.create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Dependency { code: 201, .. }));
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn department_lookup_accepts_201() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let mut input = base_input();
        input.department_id = Some(ObjectId::new().to_hex());

        let created = h.svc.create(input).await.expect("create");
        assert!(!created.department_id.is_empty());
        assert_eq!(h.departments.calls(), 1);
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn department_lookup_accepts_200() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(200, "{}"));
        let mut input = base_input();
        input.department_id = Some(ObjectId::new().to_hex());

        h.svc.create(input).await.expect("create");
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn department_rejection_propagates_status_and_body() {
        let body = r#"{"error": "There are no records that show."}"#;
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(404, body));
        let mut input = base_input();
        input.department_id = Some(ObjectId::new().to_hex());

        let err = h.svc.create(input).await.unwrap_err();
        match err {
            ServiceError::Dependency { code, body: b } => {
                assert_eq!(code, 404);
                assert_eq!(b, body);
            }
            other => panic!("expected Dependency, got {other:?}"),
        }
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn checks_run_in_sequence_unit_measure_first() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let mut input = base_input();
        input.unit_measure_id = Some(ObjectId::new().to_hex());
        input.department_id = Some(ObjectId::new().to_hex());

        h.svc.create(input).await.expect("create");
        assert_eq!(h.unit_measures.calls(), 1);
        assert_eq!(h.departments.calls(), 1);
    }

    #[tokio::test]
    async fn unreachable_dependency_is_unavailable_not_fatal() {
        let h = harness(ScriptedLookup::unreachable(), ScriptedLookup::answering(201, "{}"));
        let mut input = base_input();
        input.unit_measure_id = Some(ObjectId::new().to_hex());

        let err = h.svc.create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
        assert_eq!(h.repo.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_reference_strings_skip_validation() {
        let h = harness(ScriptedLookup::answering(404, "down"), ScriptedLookup::answering(404, "down"));
        let mut input = base_input();
        input.unit_measure_id = Some(String::new());
        input.department_id = Some(String::new());

        h.svc.create(input).await.expect("create");
        assert_eq!(h.unit_measures.calls(), 0);
        assert_eq!(h.departments.calls(), 0);
    }

    #[tokio::test]
    async fn create_round_trips_input_fields() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let input = ProductInput {
            name: Some("Bolt M6".into()),
            description: Some("Hex bolt".into()),
            quantity: Some(40),
            url_picture: Some("https://cdn.example.com/bolt.png".into()),
            location: Some("Aisle 3".into()),
            lot_flag: Some(true),
            comments: Some("reorder monthly".into()),
            ..Default::default()
        };
        let created = h.svc.create(input).await.expect("create");
        let fetched = h.svc.query_by_id(&created.id).await.expect("get");
        assert_eq!(fetched, created);
        assert_eq!(fetched.url_picture, "https://cdn.example.com/bolt.png");
        assert!(fetched.lot_flag);
        assert!(!fetched.price_lot_flag);
    }

    #[tokio::test]
    async fn partial_update_touches_only_named_fields() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let created = h.svc.create(base_input()).await.expect("create");

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = h
            .svc
            .update(ProductInput { quantity: Some(7), ..Default::default() }, &created.id)
            .await
            .expect("update");

        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.date, created.date);
        assert!(updated.last_update > created.last_update);
    }

    #[tokio::test]
    async fn update_does_not_revalidate_references() {
        let h = harness(ScriptedLookup::answering(404, "gone"), ScriptedLookup::answering(404, "gone"));
        let created = h.svc.create(base_input()).await.expect("create");

        let updated = h
            .svc
            .update(
                ProductInput { department_id: Some(ObjectId::new().to_hex()), ..Default::default() },
                &created.id,
            )
            .await
            .expect("update");
        assert!(!updated.department_id.is_empty());
        assert_eq!(h.departments.calls(), 0);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let err = h.svc.delete(&ObjectId::new().to_hex()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn reference_filters_require_well_formed_ids() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let err = h.svc.query_by_department_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn filters_by_stored_reference() {
        let h = harness(ScriptedLookup::answering(200, "{}"), ScriptedLookup::answering(201, "{}"));
        let department_id = ObjectId::new().to_hex();
        let mut input = base_input();
        input.department_id = Some(department_id.clone());
        h.svc.create(input).await.expect("create");
        h.svc.create(base_input()).await.expect("create");

        let hits = h.svc.query_by_department_id(&department_id).await.expect("filter");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].department_id, department_id);
    }
}
