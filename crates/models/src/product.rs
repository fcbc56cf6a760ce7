use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::format_timestamp;

pub const COLLECTION: &str = "products";

/// A product document. `department_id` and `unit_measure_id` are opaque
/// string references into the sibling services; nothing at the storage layer
/// enforces them. Note the update stamp field is `last_update`, unlike the
/// other collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub url_picture: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lot_flag: bool,
    #[serde(default)]
    pub price_lot_flag: bool,
    #[serde(default)]
    pub alert_minimum_stock_flag: bool,
    #[serde(default)]
    pub alert_expiration_date_flag: bool,
    #[serde(default)]
    pub comments: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub department_id: String,
    #[serde(default)]
    pub unit_measure_id: String,
}

impl Product {
    pub fn formatted_date(&self) -> String {
        format_timestamp(&self.date)
    }

    pub fn formatted_last_update(&self) -> String {
        format_timestamp(&self.last_update)
    }
}
