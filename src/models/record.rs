//! Raw content objects and the type registry.
//!
//! Every cataloged entity lives in the external record registry as a
//! generic document: a key, a type name, and a bag of JSON fields. The
//! typed overlays in this module wrap such documents to derive display
//! fields; [`TypeRegistry`] picks the overlay for a record's type name.

use crate::models::{
    author::Author,
    edition::Edition,
    subject::{Subject, SubjectKind},
    user::User,
    work::Work,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, sync::Arc};

/// A raw content object as loaded from the record registry.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Registry key, e.g. `/books/OL1M`.
    pub key: String,

    /// Registered type name, e.g. `/type/edition`.
    #[serde(rename = "type")]
    pub type_name: String,

    /// All remaining fields of the document.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(key: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            type_name: type_name.into(),
            data: Map::new(),
        }
    }

    /// Last path segment of the record key (`/books/OL1M` -> `OL1M`).
    pub fn olid(&self) -> &str {
        olid(&self.key)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// A string field; non-string and missing values read as None.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// A list-of-strings field. A bare string reads as a one-element list,
    /// which older records use for fields that later became lists.
    pub fn str_list(&self, name: &str) -> Vec<String> {
        match self.data.get(name) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A list-of-integers field (cover and photo IDs).
    pub fn int_list(&self, name: &str) -> Vec<i64> {
        match self.data.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_i64).collect(),
            _ => Vec::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.data.remove(name)
    }
}

/// Last path segment of a registry key.
pub fn olid(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Best-effort integer coercion for loosely typed record fields. Accepts
/// numbers and numeric strings; everything else falls back to `default`.
pub fn safe_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(default),
        Value::String(s) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// A record wrapped in its registered overlay.
pub enum Typed {
    Edition(Edition),
    Author(Author),
    Work(Work),
    Subject(Subject),
    User(User),
    /// Types without a registered overlay stay raw.
    Raw(Record),
}

type Constructor = fn(Record) -> Typed;

/// Maps registered type names to overlay constructors.
#[derive(Clone)]
pub struct TypeRegistry {
    constructors: Arc<HashMap<&'static str, Constructor>>,
}

impl TypeRegistry {
    /// Registry with all catalog overlays registered.
    pub fn with_defaults() -> Self {
        let mut constructors: HashMap<&'static str, Constructor> = HashMap::new();
        constructors.insert("/type/edition", |r| Typed::Edition(Edition::new(r)));
        constructors.insert("/type/author", |r| Typed::Author(Author::new(r)));
        constructors.insert("/type/work", |r| Typed::Work(Work::new(r)));
        constructors.insert("/type/subject", |r| {
            Typed::Subject(Subject::from_record(&r, SubjectKind::Subject))
        });
        constructors.insert("/type/place", |r| {
            Typed::Subject(Subject::from_record(&r, SubjectKind::Place))
        });
        constructors.insert("/type/person", |r| {
            Typed::Subject(Subject::from_record(&r, SubjectKind::Person))
        });
        constructors.insert("/type/user", |r| Typed::User(User::new(r)));
        Self {
            constructors: Arc::new(constructors),
        }
    }

    /// Wrap a record in the overlay registered for its type.
    pub fn wrap(&self, record: Record) -> Typed {
        match self.constructors.get(record.type_name.as_str()) {
            Some(make) => make(record),
            None => Typed::Raw(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn olid_is_last_key_segment() {
        assert_eq!(olid("/books/OL1M"), "OL1M");
        assert_eq!(olid("/authors/OL23A"), "OL23A");
        assert_eq!(olid("OL1M"), "OL1M");
    }

    #[test]
    fn str_list_accepts_scalar_and_list() {
        let mut record = Record::new("/books/OL1M", "/type/edition");
        record.set("lccn", json!("55009999"));
        assert_eq!(record.str_list("lccn"), vec!["55009999"]);

        record.set("lccn", json!(["55009999", "55010000"]));
        assert_eq!(record.str_list("lccn"), vec!["55009999", "55010000"]);

        assert!(record.str_list("missing").is_empty());
    }

    #[test]
    fn safe_int_coerces_strings() {
        assert_eq!(safe_int(&json!(2), 0), 2);
        assert_eq!(safe_int(&json!("3"), 0), 3);
        assert_eq!(safe_int(&json!("junk"), 0), 0);
        assert_eq!(safe_int(&json!(null), 7), 7);
    }

    #[test]
    fn registry_dispatches_on_type_name() {
        let registry = TypeRegistry::with_defaults();

        let mut record = Record::new("/books/OL1M", "/type/edition");
        record.set("title", json!("Dune"));
        assert!(matches!(registry.wrap(record), Typed::Edition(_)));

        let record = Record::new("/subjects/places/France", "/type/place");
        let Typed::Subject(subject) = registry.wrap(record) else {
            panic!("expected subject overlay");
        };
        assert_eq!(subject.kind(), SubjectKind::Place);

        let record = Record::new("/x/OL1X", "/type/unknown");
        assert!(matches!(registry.wrap(record), Typed::Raw(_)));
    }
}
