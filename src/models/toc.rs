//! Table-of-contents text codec.
//!
//! The edit form presents a table of contents as plain text, one entry per
//! line: leading `*`s mark the nesting level, the rest is
//! `label | title | page`. Stored entries are structured records; older
//! records may hold bare strings, which are treated as level-0 titles.

use serde::{Deserialize, Serialize};

/// One table-of-contents entry.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TocEntry {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pagenum: String,
}

/// Render entries as editable text, one line per entry.
pub fn format_toc(entries: &[TocEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "{} {}",
                "*".repeat(e.level as usize),
                [e.label.as_str(), e.title.as_str(), e.pagenum.as_str()].join(" | ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse edited text back into entries. Blank lines are skipped.
pub fn parse_toc(text: &str) -> Vec<TocEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_toc_row)
        .collect()
}

/// Parse one row: leading stars give the level, the remainder splits on
/// `|` into up to three fields. A bare line is a title; two fields are
/// label and title.
fn parse_toc_row(line: &str) -> TocEntry {
    let stripped = line.trim_start_matches('*');
    let level = (line.len() - stripped.len()) as u32;

    let fields: Vec<&str> = stripped.splitn(3, '|').map(str::trim).collect();
    let (label, title, pagenum) = match fields.as_slice() {
        [title] => ("", *title, ""),
        [label, title] => (*label, *title, ""),
        [label, title, pagenum] => (*label, *title, *pagenum),
        _ => ("", "", ""),
    };

    TocEntry {
        level,
        label: label.to_string(),
        title: title.to_string(),
        pagenum: pagenum.to_string(),
    }
}
