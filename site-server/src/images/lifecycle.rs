//! Images released by record updates and deletes

use std::collections::HashSet;

use serde_json::Value;

use super::descriptor::RecordImages;
use super::reference::{ImageRefClassifier, extract_filename};

/// Local filenames the old record referenced that the new record no longer
/// does
///
/// Only local references of the old record are candidates. A candidate
/// survives if the new record still points at the same filename through any
/// reference form. Pass `Value::Null` as `new` for a deleted record.
pub fn released_images(
    kind: &RecordImages,
    old: &Value,
    new: &Value,
    classifier: &ImageRefClassifier,
) -> Vec<String> {
    let kept: HashSet<String> = kind
        .references(new)
        .into_iter()
        .filter_map(extract_filename)
        .collect();

    let mut seen = HashSet::new();
    classifier
        .filter_local(kind.references(old))
        .into_iter()
        .filter_map(extract_filename)
        .filter(|name| !kept.contains(name))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Every local filename a deleted record referenced
pub fn released_on_delete(
    kind: &RecordImages,
    old: &Value,
    classifier: &ImageRefClassifier,
) -> Vec<String> {
    released_images(kind, old, &Value::Null, classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::descriptor::{BUSINESS_INFO, CLIENT, PROJECT};
    use serde_json::json;

    #[test]
    fn test_removed_image_is_released() {
        let old = json!({ "images": ["/uploads/a.jpg", "/uploads/b.jpg"] });
        let new = json!({ "images": ["/uploads/a.jpg"] });
        assert_eq!(
            released_images(&PROJECT, &old, &new, &ImageRefClassifier::default()),
            vec!["b.jpg"]
        );
    }

    #[test]
    fn test_unchanged_field_releases_nothing() {
        let old = json!({ "title": "Kitchen", "images": ["/uploads/a.jpg"] });
        let new = json!({ "title": "Kitchen v2", "images": ["/uploads/a.jpg"] });
        assert!(released_images(&PROJECT, &old, &new, &ImageRefClassifier::default()).is_empty());
    }

    #[test]
    fn test_same_file_in_another_form_is_kept() {
        let old = json!({ "images": ["http://localhost:5000/uploads/a.jpg"] });
        let new = json!({ "images": ["/uploads/a.jpg"] });
        assert!(released_images(&PROJECT, &old, &new, &ImageRefClassifier::default()).is_empty());
    }

    #[test]
    fn test_external_images_never_released() {
        let old = json!({ "image": "https://images.unsplash.com/xyz" });
        let new = json!({ "image": "" });
        assert!(released_images(&CLIENT, &old, &new, &ImageRefClassifier::default()).is_empty());
    }

    #[test]
    fn test_delete_releases_all_local_once() {
        let old = json!({ "images": [
            "/uploads/a.jpg",
            "https://res.cloudinary.com/demo/x.jpg",
            "/uploads/a.jpg",
            "/uploads/b.jpg"
        ] });
        assert_eq!(
            released_on_delete(&PROJECT, &old, &ImageRefClassifier::default()),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_business_info_nested_fields() {
        let old = json!({ "about": {
            "ceoImage": "/uploads/ceo-old.jpg",
            "storyImage": "/uploads/story.jpg",
            "shopImages": ["/uploads/s1.jpg", "/uploads/s2.jpg"]
        } });
        let new = json!({ "about": {
            "ceoImage": "/uploads/ceo-new.jpg",
            "storyImage": "/uploads/story.jpg",
            "shopImages": ["/uploads/s2.jpg"]
        } });
        assert_eq!(
            released_images(&BUSINESS_INFO, &old, &new, &ImageRefClassifier::default()),
            vec!["ceo-old.jpg", "s1.jpg"]
        );
    }
}
