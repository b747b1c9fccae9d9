//! Edition overlay.
//!
//! Wraps a raw `/type/edition` record and derives the fields edition pages
//! display: the effective title, covers, identifiers and classifications,
//! weight and physical dimensions, the table of contents as editable text,
//! and external links.

use crate::models::identifiers::{
    CLASSIFICATION_SCHEMES, EDITABLE_IDENTIFIER_FIELDS, IDENTIFIER_SCHEMES, Identifier,
    IdentifierSet, Scheme,
};
use crate::models::record::{Record, safe_int};
use crate::models::toc::{TocEntry, format_toc, parse_toc};
use crate::models::units::{Dimensions, Weight};
use crate::services::coverstore::{CoverstoreClient, Image, ImageCategory, ImageSize};
use crate::services::ServiceResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An external link attached to an edition.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// An edited (name, value) identifier pair submitted from a form.
#[derive(Deserialize, Clone, Debug)]
pub struct IdentifierEdit {
    pub name: String,
    pub value: String,
}

pub struct Edition {
    record: Record,
}

impl Edition {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn olid(&self) -> &str {
        self.record.olid()
    }

    /// Effective display title: `title_prefix` joined onto `title` when a
    /// prefix is present.
    pub fn title(&self) -> String {
        let title = self.record.str_field("title").unwrap_or_default();
        match self.record.str_field("title_prefix") {
            Some(prefix) if !prefix.is_empty() => format!("{} {}", prefix, title),
            _ => title.to_string(),
        }
    }

    /// Cover images. Uses the record's `covers` field when present,
    /// otherwise asks the coverstore what it has for this OLID.
    pub async fn covers(&self, coverstore: &CoverstoreClient) -> ServiceResult<Vec<Image>> {
        let ids = self.record.int_list("covers");
        if !ids.is_empty() {
            return Ok(ids
                .into_iter()
                .map(|id| Image {
                    category: ImageCategory::Book,
                    id,
                })
                .collect());
        }
        coverstore.query_ids(ImageCategory::Book, self.olid()).await
    }

    /// The primary cover, if any.
    pub async fn cover(&self, coverstore: &CoverstoreClient) -> ServiceResult<Option<Image>> {
        Ok(self.covers(coverstore).await?.into_iter().next())
    }

    /// URL of the primary cover at the given size.
    pub async fn cover_url(
        &self,
        coverstore: &CoverstoreClient,
        size: ImageSize,
    ) -> ServiceResult<Option<String>> {
        Ok(self
            .cover(coverstore)
            .await?
            .map(|image| coverstore.image_url(&image, size)))
    }

    /// All displayable identifiers, starting with the read-only OLID entry.
    pub fn identifiers(&self) -> IdentifierSet {
        let mut set = IdentifierSet::default();
        set.push(Identifier {
            name: "olid".into(),
            label: "Open Library".into(),
            value: self.olid().to_string(),
            url: None,
            readonly: true,
        });
        self.collect(IDENTIFIER_SCHEMES, &mut set);
        set
    }

    /// Classification entries (Dewey, LC).
    pub fn classifications(&self) -> IdentifierSet {
        let mut set = IdentifierSet::default();
        self.collect(CLASSIFICATION_SCHEMES, &mut set);
        set
    }

    /// Collect entries for each scheme, one per value on the record.
    fn collect(&self, schemes: &[Scheme], set: &mut IdentifierSet) {
        for scheme in schemes {
            for value in self.record.str_list(scheme.name) {
                let url = scheme.url_for(&value);
                set.push(Identifier {
                    name: scheme.name.to_string(),
                    label: scheme.label.to_string(),
                    value,
                    url,
                    readonly: false,
                });
            }
        }
    }

    /// Rewrite identifier fields from submitted (name, value) pairs.
    ///
    /// Unknown names are ignored. Existing values of every editable field
    /// are cleared first, so omitted identifiers are removed. `ocaid` is a
    /// scalar field; all other accepted fields are lists.
    pub fn set_identifiers(&mut self, edits: &[IdentifierEdit]) {
        for name in EDITABLE_IDENTIFIER_FIELDS {
            self.record.remove(name);
        }

        for edit in edits {
            if !EDITABLE_IDENTIFIER_FIELDS.contains(&edit.name.as_str()) {
                continue;
            }
            if edit.name == "ocaid" {
                if self.record.get("ocaid").is_none() {
                    self.record.set("ocaid", Value::String(edit.value.clone()));
                }
                continue;
            }
            let entry = self
                .record
                .data
                .entry(edit.name.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = entry {
                values.push(Value::String(edit.value.clone()));
            }
        }
    }

    /// Parsed weight, when the record has one in a recognized form.
    pub fn weight(&self) -> Option<Weight> {
        self.record.str_field("weight").and_then(Weight::parse)
    }

    pub fn set_weight(&mut self, weight: Option<&Weight>) {
        match weight {
            Some(w) => self.record.set("weight", Value::String(w.format())),
            None => {
                self.record.remove("weight");
            }
        }
    }

    /// Parsed physical dimensions, when present and well-formed.
    pub fn physical_dimensions(&self) -> Option<Dimensions> {
        self.record
            .str_field("physical_dimensions")
            .and_then(Dimensions::parse)
    }

    pub fn set_physical_dimensions(&mut self, dimensions: Option<&Dimensions>) {
        match dimensions {
            Some(d) => self
                .record
                .set("physical_dimensions", Value::String(d.format())),
            None => {
                self.record.remove("physical_dimensions");
            }
        }
    }

    /// Table-of-contents entries. Older records store rows as bare
    /// strings; those read as level-0 titles.
    pub fn toc_entries(&self) -> Vec<TocEntry> {
        let Some(Value::Array(rows)) = self.record.get("table_of_contents") else {
            return Vec::new();
        };
        rows.iter()
            .map(|row| match row {
                Value::String(title) => TocEntry {
                    title: title.clone(),
                    ..TocEntry::default()
                },
                Value::Object(fields) => TocEntry {
                    level: fields.get("level").map(|v| safe_int(v, 0)).unwrap_or(0).max(0) as u32,
                    label: field_str(fields, "label"),
                    title: field_str(fields, "title"),
                    pagenum: field_str(fields, "pagenum"),
                },
                _ => TocEntry::default(),
            })
            .collect()
    }

    /// The table of contents as editable text.
    pub fn toc_text(&self) -> String {
        format_toc(&self.toc_entries())
    }

    /// Replace the table of contents from edited text.
    pub fn set_toc_text(&mut self, text: &str) {
        let rows = parse_toc(text)
            .into_iter()
            .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
            .collect();
        self.record.set("table_of_contents", Value::Array(rows));
    }

    /// External links: legacy (`uris` zipped with `uri_descriptions`)
    /// first, then structured `links` entries.
    pub fn links(&self) -> Vec<Link> {
        let uris = self.record.str_list("uris");
        let descriptions = self.record.str_list("uri_descriptions");
        let mut links: Vec<Link> = uris
            .into_iter()
            .zip(descriptions)
            .map(|(url, title)| Link { url, title })
            .collect();

        if let Some(Value::Array(rows)) = self.record.get("links") {
            for row in rows {
                if let Ok(link) = serde_json::from_value::<Link>(row.clone()) {
                    links.push(link);
                }
            }
        }
        links
    }
}

fn field_str(fields: &serde_json::Map<String, Value>, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edition(fields: Value) -> Edition {
        let mut record = Record::new("/books/OL1M", "/type/edition");
        if let Value::Object(map) = fields {
            record.data = map;
        }
        Edition::new(record)
    }

    fn edit(name: &str, value: &str) -> IdentifierEdit {
        IdentifierEdit {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn title_includes_prefix_when_present() {
        let e = edition(json!({"title_prefix": "The", "title": "Lord of the Rings"}));
        assert_eq!(e.title(), "The Lord of the Rings");

        let e = edition(json!({"title": "Dune"}));
        assert_eq!(e.title(), "Dune");

        let e = edition(json!({"title_prefix": "", "title": "Dune"}));
        assert_eq!(e.title(), "Dune");
    }

    #[test]
    fn identifiers_start_with_readonly_olid() {
        let e = edition(json!({
            "isbn_10": ["0451526538"],
            "lccn": "96072233",
            "oclc_numbers": ["36792831"]
        }));
        let ids = e.identifiers();
        let first = ids.iter().next().unwrap();
        assert_eq!(first.name, "olid");
        assert_eq!(first.value, "OL1M");
        assert!(first.readonly);

        let names: Vec<&str> = ids.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["olid", "isbn_10", "lccn", "oclc_numbers"]);

        let lccn = &ids.get_all("lccn")[0];
        assert_eq!(lccn.url.as_deref(), Some("http://lccn.loc.gov/96072233"));
        let oclc = &ids.get_all("oclc_numbers")[0];
        assert_eq!(
            oclc.url.as_deref(),
            Some("http://www.worldcat.org/oclc/36792831?tab=details")
        );
    }

    #[test]
    fn multi_valued_identifiers_expand() {
        let e = edition(json!({"isbn_10": ["111", "222"]}));
        let ids = e.identifiers();
        let values: Vec<&str> = ids
            .get_all("isbn_10")
            .iter()
            .map(|i| i.value.as_str())
            .collect();
        assert_eq!(values, vec!["111", "222"]);
    }

    #[test]
    fn set_identifiers_clears_then_rewrites() {
        let mut e = edition(json!({"isbn_10": ["old"], "lccn": ["gone"]}));
        e.set_identifiers(&[
            edit("isbn_10", "111"),
            edit("isbn_10", "222"),
            edit("wikidata", "Q42"),
        ]);

        assert_eq!(e.record().str_list("isbn_10"), vec!["111", "222"]);
        assert!(e.record().get("lccn").is_none());
        assert!(e.record().get("wikidata").is_none());
    }

    #[test]
    fn set_identifiers_keeps_ocaid_scalar() {
        let mut e = edition(json!({}));
        e.set_identifiers(&[edit("ocaid", "dune0000herb"), edit("ocaid", "second")]);
        assert_eq!(e.record().str_field("ocaid"), Some("dune0000herb"));
    }

    #[test]
    fn classifications_cover_dewey_and_lc() {
        let e = edition(json!({
            "dewey_decimal_class": ["813.54"],
            "lc_classifications": ["PS3558.E63"]
        }));
        let c = e.classifications();
        let names: Vec<&str> = c.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["dewey_decimal_class", "lc_classifications"]);
        assert!(c.iter().all(|i| i.url.is_none()));
    }

    #[test]
    fn weight_and_dimensions_round_trip_through_record() {
        let mut e = edition(json!({}));
        e.set_weight(Some(&Weight {
            value: 1.2,
            units: "pounds".into(),
        }));
        assert_eq!(e.record().str_field("weight"), Some("1.2 pounds"));
        assert_eq!(e.weight().unwrap().value, 1.2);

        e.set_physical_dimensions(Some(&Dimensions {
            height: 9.0,
            width: 3.0,
            depth: 2.0,
            units: "inches".into(),
        }));
        assert_eq!(
            e.record().str_field("physical_dimensions"),
            Some("9 x 3 x 2 inches")
        );
        let d = e.physical_dimensions().unwrap();
        assert_eq!(d.width, 3.0);

        e.set_weight(None);
        assert!(e.weight().is_none());
    }

    #[test]
    fn malformed_unit_fields_read_as_none() {
        let e = edition(json!({"weight": "about a pound", "physical_dimensions": "big"}));
        assert!(e.weight().is_none());
        assert!(e.physical_dimensions().is_none());
    }

    #[test]
    fn toc_text_handles_legacy_string_rows() {
        let e = edition(json!({
            "table_of_contents": [
                "Introduction",
                {"level": 1, "label": "Chapter 1", "title": "Welcome", "pagenum": "2"},
                {"level": "2", "title": "Deeper"}
            ]
        }));
        assert_eq!(
            e.toc_text(),
            "  | Introduction | \n* Chapter 1 | Welcome | 2\n**  | Deeper | "
        );
    }

    #[test]
    fn set_toc_text_stores_structured_rows() {
        let mut e = edition(json!({}));
        e.set_toc_text("* Chapter 1 | Welcome | 2\nEpilogue");
        let entries = e.toc_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, 1);
        assert_eq!(entries[0].label, "Chapter 1");
        assert_eq!(entries[1].title, "Epilogue");
    }

    #[test]
    fn links_merge_legacy_uris_and_structured_links() {
        let e = edition(json!({
            "uris": ["http://a.example.org"],
            "uri_descriptions": ["Publisher page"],
            "links": [{"url": "http://b.example.org", "title": "Errata"}]
        }));
        let links = e.links();
        assert_eq!(
            links,
            vec![
                Link {
                    url: "http://a.example.org".into(),
                    title: "Publisher page".into()
                },
                Link {
                    url: "http://b.example.org".into(),
                    title: "Errata".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn covers_prefer_record_ids() {
        // No HTTP happens when the record already carries cover IDs, so a
        // client pointed at an unroutable base is safe here.
        let coverstore =
            CoverstoreClient::new(reqwest::Client::new(), "http://127.0.0.1:9/covers");
        let e = edition(json!({"covers": [101, 102]}));

        let covers = e.covers(&coverstore).await.unwrap();
        assert_eq!(covers.len(), 2);
        assert_eq!(covers[0].id, 101);
        assert_eq!(
            e.cover_url(&coverstore, ImageSize::Medium)
                .await
                .unwrap()
                .unwrap(),
            "http://127.0.0.1:9/covers/b/id/101-M.jpg"
        );
    }
}
