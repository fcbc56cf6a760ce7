use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::format_timestamp;

pub const COLLECTION: &str = "unit_measures";

/// A unit-of-measure document (e.g. "Kilogram" / "kg"). Same lifecycle as
/// `Department`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMeasure {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_update_date: DateTime<Utc>,
}

impl UnitMeasure {
    pub fn formatted_date(&self) -> String {
        format_timestamp(&self.date)
    }

    pub fn formatted_last_update_date(&self) -> String {
        format_timestamp(&self.last_update_date)
    }
}
