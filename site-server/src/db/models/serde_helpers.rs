//! Serde helpers for SurrealDB records
//!
//! Record ids go out on the wire as `"table:key"` strings and are accepted
//! back either in that form or in SurrealDB's native representation.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Deserialize a string that treats null as empty
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts both `"table:key"` strings and native record ids
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:key' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// `Option<RecordId>` as an optional `"table:key"` string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

/// Render an optional record id for DTOs that carry plain strings
pub fn id_string(id: &Option<RecordId>) -> String {
    id.as_ref().map(|id| id.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(default, with = "option_record_id")]
        id: Option<RecordId>,
        #[serde(default, deserialize_with = "bool_true")]
        open: bool,
    }

    #[test]
    fn test_record_id_from_string() {
        let doc: Doc = serde_json::from_str(r#"{"id":"project:abc","open":null}"#).unwrap();
        assert_eq!(doc.id, Some(RecordId::from_table_key("project", "abc")));
        assert!(doc.open);
    }

    #[test]
    fn test_record_id_to_string() {
        let doc = Doc {
            id: Some(RecordId::from_table_key("client", "xyz")),
            open: false,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "client:xyz");
        assert_eq!(id_string(&doc.id), "client:xyz");
        assert_eq!(id_string(&None), "");
    }
}
