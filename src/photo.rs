// src/photo.rs

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog record as the backend stores it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Photo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub camera_brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photo_category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gear_used: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photo_taken: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photo_path: String,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Photo {
    /// Calendar date the photo was taken, if the stored value parses.
    pub fn taken_on(&self) -> Option<NaiveDate> {
        parse_photo_date(&self.photo_taken)
    }
}

/// Accepts the two shapes the backend emits: `YYYY-MM-DD` and RFC 3339 timestamps.
pub fn parse_photo_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    // Laravel's default serialization: "2024-05-01 10:22:00"
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
