//! Domain-model overlays for the catalog.
//!
//! Records are owned and persisted by the external registry; these types
//! wrap loaded records to derive the fields pages display. Small
//! structured-text fields (unit strings, the table of contents,
//! identifiers) get their own parser/formatter modules.

pub mod author;
pub mod edition;
pub mod identifiers;
pub mod record;
pub mod subject;
pub mod toc;
pub mod units;
pub mod user;
pub mod work;
