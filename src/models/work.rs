//! Work overlay.

use crate::models::record::Record;
use serde_json::Value;

pub struct Work {
    record: Record,
}

impl Work {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn olid(&self) -> &str {
        self.record.olid()
    }

    pub fn title(&self) -> &str {
        self.record.str_field("title").unwrap_or_default()
    }

    /// Subject names as plain strings. Records store subjects either as
    /// strings or as `{name: ...}` references.
    pub fn subjects(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.record.get("subjects") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(fields) => fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work(subjects: Value) -> Work {
        let mut record = Record::new("/works/OL45W", "/type/work");
        record.set("subjects", subjects);
        Work::new(record)
    }

    #[test]
    fn string_subjects_pass_through() {
        let w = work(json!(["Travel", "France"]));
        assert_eq!(w.subjects(), vec!["Travel", "France"]);
    }

    #[test]
    fn record_subjects_read_their_name() {
        let w = work(json!([
            {"name": "Travel", "key": "/subjects/Travel"},
            {"name": "France", "key": "/subjects/places/France"}
        ]));
        assert_eq!(w.subjects(), vec!["Travel", "France"]);
    }

    #[test]
    fn missing_subjects_read_as_empty() {
        let record = Record::new("/works/OL45W", "/type/work");
        assert!(Work::new(record).subjects().is_empty());
    }
}
