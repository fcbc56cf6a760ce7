//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access behind one repository trait
//!   per entity, so a fake store can substitute in tests.
//! - Owns the single conversion from storage documents to response maps.
//! - Product creation additionally consults the sibling services before
//!   persisting a record that references them.

pub mod errors;
pub mod search;
pub mod department;
pub mod unit_measure;
pub mod product;

use mongodb::bson::oid::ObjectId;

use crate::errors::ServiceError;

/// Parse an opaque string id into the storage id type. A malformed id is a
/// validation failure, never a not-found.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id)
        .map_err(|_| ServiceError::Validation(format!("invalid id format: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_object_id() {
        let err = parse_object_id("not-an-oid").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn accepts_canonical_object_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }
}
