//! Client Testimonial Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

fn default_rating() -> u8 {
    5
}

/// Client testimonial
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// e.g. CEO, Homeowner
    pub role: String,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub created_at: i64,
}

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[validate(length(min = 1, message = "feedback is required"))]
    pub feedback: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
}

/// Update client payload
///
/// Sending `"image": ""` clears the image and releases the old file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_defaults_and_range() {
        let create: ClientCreate = serde_json::from_str(
            r#"{"name":"Sara","role":"Homeowner","feedback":"Great work"}"#,
        )
        .unwrap();
        assert_eq!(create.rating, 5);
        assert!(create.validate().is_ok());

        let bad = ClientCreate { rating: 6, ..create };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update: ClientUpdate = serde_json::from_str(r#"{"feedback":"Updated"}"#).unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "feedback": "Updated" }));
    }
}
