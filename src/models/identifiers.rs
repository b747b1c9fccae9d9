//! Edition identifiers and classifications.
//!
//! Identifier fields on an edition record (ISBNs, LCCN, OCLC numbers,
//! classification codes) are flattened into labeled entries for display,
//! keeping insertion order and allowing several values per scheme.

use serde::Serialize;

/// One displayable identifier entry.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Identifier {
    /// Field name on the record (e.g. `isbn_10`).
    pub name: String,
    /// Human-readable label (e.g. `ISBN 10`).
    pub label: String,
    pub value: String,
    /// Outbound link for this value, when the scheme defines one.
    pub url: Option<String>,
    /// Read-only entries (the OLID) cannot be edited away.
    pub readonly: bool,
}

/// An insertion-ordered multi-map of identifier entries.
///
/// Schemes appear in the order they were added and each scheme may
/// contribute several entries (one per value on the record).
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct IdentifierSet {
    entries: Vec<Identifier>,
}

impl IdentifierSet {
    pub fn push(&mut self, entry: Identifier) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.iter()
    }

    /// All entries for a given scheme name, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&Identifier> {
        self.entries.iter().filter(|e| e.name == name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A known identifier scheme: record field, display label, and an optional
/// URL template with a `{value}` placeholder.
#[derive(Clone, Copy, Debug)]
pub struct Scheme {
    pub name: &'static str,
    pub label: &'static str,
    pub url_format: Option<&'static str>,
}

impl Scheme {
    pub fn url_for(&self, value: &str) -> Option<String> {
        self.url_format.map(|f| f.replace("{value}", value))
    }
}

/// Identifier schemes shown on edition pages.
pub const IDENTIFIER_SCHEMES: &[Scheme] = &[
    Scheme {
        name: "isbn_10",
        label: "ISBN 10",
        url_format: None,
    },
    Scheme {
        name: "isbn_13",
        label: "ISBN 13",
        url_format: None,
    },
    Scheme {
        name: "lccn",
        label: "LC Control Number",
        url_format: Some("http://lccn.loc.gov/{value}"),
    },
    Scheme {
        name: "oclc_numbers",
        label: "OCLC",
        url_format: Some("http://www.worldcat.org/oclc/{value}?tab=details"),
    },
];

/// Classification schemes (no outbound links).
pub const CLASSIFICATION_SCHEMES: &[Scheme] = &[
    Scheme {
        name: "dewey_decimal_class",
        label: "Dewey Decimal Class",
        url_format: None,
    },
    Scheme {
        name: "lc_classifications",
        label: "Library of Congress",
        url_format: None,
    },
];

/// Record fields that may be rewritten through identifier edits. Anything
/// else submitted by the form is ignored.
pub const EDITABLE_IDENTIFIER_FIELDS: &[&str] = &[
    "isbn_10",
    "isbn_13",
    "lccn",
    "oclc_numbers",
    "ocaid",
    "dewey_decimal_class",
    "lc_classifications",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order_and_duplicates() {
        let mut set = IdentifierSet::default();
        for value in ["111", "222"] {
            set.push(Identifier {
                name: "isbn_10".into(),
                label: "ISBN 10".into(),
                value: value.into(),
                url: None,
                readonly: false,
            });
        }
        set.push(Identifier {
            name: "lccn".into(),
            label: "LC Control Number".into(),
            value: "55009999".into(),
            url: None,
            readonly: false,
        });

        let values: Vec<&str> = set.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["111", "222", "55009999"]);
        assert_eq!(set.get_all("isbn_10").len(), 2);
    }

    #[test]
    fn scheme_url_substitutes_value() {
        let lccn = IDENTIFIER_SCHEMES
            .iter()
            .find(|s| s.name == "lccn")
            .unwrap();
        assert_eq!(
            lccn.url_for("55009999").as_deref(),
            Some("http://lccn.loc.gov/55009999")
        );

        let isbn = IDENTIFIER_SCHEMES
            .iter()
            .find(|s| s.name == "isbn_10")
            .unwrap();
        assert_eq!(isbn.url_for("111"), None);
    }
}
