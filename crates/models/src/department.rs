use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::format_timestamp;

pub const COLLECTION: &str = "departments";

/// A department document. `date` is fixed at first insert; `last_update_date`
/// is refreshed on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_update_date: DateTime<Utc>,
}

impl Department {
    pub fn formatted_date(&self) -> String {
        format_timestamp(&self.date)
    }

    pub fn formatted_last_update_date(&self) -> String {
        format_timestamp(&self.last_update_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};

    #[test]
    fn serializes_to_bson_document_shape() {
        let now = Utc::now();
        let dep = Department {
            id: None,
            name: "Sales".into(),
            description: "Sales dept".into(),
            date: now,
            last_update_date: now,
        };
        let doc = bson::to_document(&dep).expect("to_document");
        // `_id` is absent until the driver assigns one
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("name").unwrap(), "Sales");
        assert!(matches!(doc.get("date"), Some(Bson::DateTime(_))));
        assert!(matches!(doc.get("last_update_date"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn round_trips_through_bson() {
        let dep = Department {
            id: Some(ObjectId::new()),
            name: "Warehouse".into(),
            description: String::new(),
            date: Utc::now(),
            last_update_date: Utc::now(),
        };
        let doc = bson::to_document(&dep).expect("to_document");
        let back: Department = bson::from_document(doc).expect("from_document");
        assert_eq!(back.id, dep.id);
        assert_eq!(back.name, dep.name);
    }
}
