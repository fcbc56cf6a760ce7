//! Document definitions for the product management store.
//! - One module per collection, each owning its storage struct.
//! - Timestamps are stamped explicitly by the service layer and rendered
//!   through a single fixed-pattern formatter.

pub mod db;
pub mod department;
pub mod unit_measure;
pub mod product;

use chrono::{DateTime, Utc};

/// Wire format for both timestamps, e.g. `2024-03-01T12:30:45.123456Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_is_utc_with_micros() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(123456);
        assert_eq!(format_timestamp(&ts), "2024-03-01T12:30:45.123456Z");
    }

    #[test]
    fn timestamp_format_pads_micros() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T00:00:00.000000Z");
    }
}
