//! Upload API DTOs

use serde::{Deserialize, Serialize};

/// Image upload result
///
/// `file_path` is what the frontend stores in a record's image field: a
/// `/uploads/<name>` path for local storage or an absolute URL on the asset
/// host for the cloud store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
    pub public_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_names() {
        let resp = UploadResponse {
            file_path: "/uploads/image-1.jpg".into(),
            public_id: "image-1".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["filePath"], "/uploads/image-1.jpg");
        assert_eq!(json["publicId"], "image-1");
    }
}
