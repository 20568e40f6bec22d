//! Business Info Model (Singleton)
//!
//! 网站的公司资料，只有一条记录 (`business_info:main`)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub label: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub suffix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Socials {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub map_location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub whatsapp: Option<String>,
    pub socials: Socials,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    /// Monday, Tuesday, ...
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub day: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_open: bool,
    /// e.g. "9:00 AM - 6:00 PM"
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub time: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueItem {
    /// Lucide icon name
    pub icon: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineItem {
    pub year: String,
    pub title: String,
    pub description: String,
}

/// About page content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub years_experience: Option<u32>,
    pub projects_completed: Option<u32>,
    pub ceo_name: Option<String>,
    pub ceo_image: Option<String>,
    pub story_title: String,
    pub story_subtitle: String,
    pub story_image: Option<String>,
    pub story_paragraph1: Option<String>,
    pub story_paragraph2: Option<String>,
    pub values: Vec<ValueItem>,
    pub timeline: Vec<TimelineItem>,
    pub shop_images: Vec<String>,
}

impl Default for About {
    fn default() -> Self {
        Self {
            years_experience: None,
            projects_completed: None,
            ceo_name: None,
            ceo_image: None,
            story_title: "Our Story".to_string(),
            story_subtitle:
                "From a small workshop in Rawalpindi to a nationwide leader in fabrication."
                    .to_string(),
            story_image: None,
            story_paragraph1: None,
            story_paragraph2: None,
            values: Vec::new(),
            timeline: Vec::new(),
            shop_images: Vec::new(),
        }
    }
}

/// Business info entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub working_hours: Vec<WorkingHours>,
    #[serde(default)]
    pub about: About,
}

/// Upsert payload
///
/// Each provided section replaces the stored section as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Stat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<Vec<WorkingHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<About>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let info: BusinessInfo = serde_json::from_str(
            r#"{"workingHours":[{"day":"Sunday","isOpen":null,"time":null}],"about":{"ceoName":"A"}}"#,
        )
        .unwrap();
        assert!(info.stats.is_empty());
        assert_eq!(info.working_hours[0].day, "Sunday");
        assert!(info.working_hours[0].is_open);
        assert_eq!(info.working_hours[0].time, "");
        assert_eq!(info.about.ceo_name.as_deref(), Some("A"));
        assert_eq!(info.about.story_title, "Our Story");
    }

    #[test]
    fn test_about_wire_names() {
        let about = About {
            ceo_image: Some("/uploads/ceo.jpg".into()),
            shop_images: vec!["/uploads/shop.jpg".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&about).unwrap();
        assert_eq!(json["ceoImage"], "/uploads/ceo.jpg");
        assert_eq!(json["shopImages"][0], "/uploads/shop.jpg");
        assert_eq!(json["storyParagraph1"], serde_json::Value::Null);
    }
}
