//! Declarative description of where each record type keeps image references
//!
//! The reconciliation scan and the update/delete hooks both iterate these
//! descriptors, so adding a new image field is a one-line change here.

use serde_json::Value;

/// Shape of an image field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single reference string
    Single,
    /// An array of reference strings
    List,
}

/// One image field, addressed by a dotted path (`about.shopImages`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageField {
    pub path: &'static str,
    pub kind: FieldKind,
}

impl ImageField {
    pub const fn single(path: &'static str) -> Self {
        Self {
            path,
            kind: FieldKind::Single,
        }
    }

    pub const fn list(path: &'static str) -> Self {
        Self {
            path,
            kind: FieldKind::List,
        }
    }

    /// Top-level document field this path lives under
    pub fn root(&self) -> &'static str {
        self.path.split('.').next().unwrap_or(self.path)
    }

    /// References stored in this field of `record`
    ///
    /// A value of the wrong shape (a string where a list is expected, a
    /// number, an object) reads as no references at all.
    pub fn references<'a>(&self, record: &'a Value) -> Vec<&'a str> {
        let Some(value) = self.lookup(record) else {
            return Vec::new();
        };
        match (self.kind, value) {
            (FieldKind::Single, Value::String(s)) if !s.is_empty() => vec![s.as_str()],
            (FieldKind::List, Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.path
            .split('.')
            .try_fold(record, |current, segment| current.get(segment))
    }
}

/// Image-bearing fields of one record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordImages {
    /// Store table name
    pub table: &'static str,
    pub fields: &'static [ImageField],
}

impl RecordImages {
    /// Every reference the record holds, in field order
    pub fn references<'a>(&self, record: &'a Value) -> Vec<&'a str> {
        self.fields
            .iter()
            .flat_map(|field| field.references(record))
            .collect()
    }

    /// Distinct top-level fields needed to read all image fields
    pub fn root_fields(&self) -> Vec<&'static str> {
        let mut roots: Vec<&'static str> = Vec::new();
        for field in self.fields {
            let root = field.root();
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }
}

pub const PROJECT: RecordImages = RecordImages {
    table: "project",
    fields: &[ImageField::list("images")],
};

pub const SERVICE: RecordImages = RecordImages {
    table: "service",
    fields: &[ImageField::list("images")],
};

pub const CLIENT: RecordImages = RecordImages {
    table: "client",
    fields: &[ImageField::single("image")],
};

pub const BUSINESS_INFO: RecordImages = RecordImages {
    table: "business_info",
    fields: &[
        ImageField::single("about.ceoImage"),
        ImageField::single("about.storyImage"),
        ImageField::list("about.shopImages"),
    ],
};

/// All record types scanned by the reconciliation job
pub const ALL: &[RecordImages] = &[PROJECT, SERVICE, CLIENT, BUSINESS_INFO];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_field() {
        let record = json!({ "images": ["/uploads/a.jpg", "", 7, "/uploads/b.jpg"] });
        assert_eq!(
            PROJECT.references(&record),
            vec!["/uploads/a.jpg", "/uploads/b.jpg"]
        );
    }

    #[test]
    fn test_wrong_shape_reads_as_empty() {
        assert!(PROJECT.references(&json!({ "images": "/uploads/a.jpg" })).is_empty());
        assert!(CLIENT.references(&json!({ "image": ["/uploads/a.jpg"] })).is_empty());
        assert!(CLIENT.references(&json!({ "image": null })).is_empty());
        assert!(SERVICE.references(&json!({ "title": "no images" })).is_empty());
        assert!(SERVICE.references(&Value::Null).is_empty());
    }

    #[test]
    fn test_nested_fields() {
        let record = json!({
            "about": {
                "ceoImage": "/uploads/ceo.jpg",
                "storyImage": "",
                "shopImages": ["/uploads/shop1.jpg", "/uploads/shop2.jpg"]
            }
        });
        assert_eq!(
            BUSINESS_INFO.references(&record),
            vec!["/uploads/ceo.jpg", "/uploads/shop1.jpg", "/uploads/shop2.jpg"]
        );
        assert!(BUSINESS_INFO.references(&json!({ "about": "text" })).is_empty());
    }

    #[test]
    fn test_root_fields() {
        assert_eq!(BUSINESS_INFO.root_fields(), vec!["about"]);
        assert_eq!(CLIENT.root_fields(), vec!["image"]);
        assert_eq!(ALL.len(), 4);
    }
}
