//! Fixed-field unit strings such as `"9 x 3 x 2 inches"` or `"2.5 pounds"`.
//!
//! Editions store weight and physical dimensions as free-ish text. The
//! parser accepts decimal values separated by `x` (spaces optional) with a
//! trailing units word, and the formatter produces the same shape back, so
//! a value can be round-tripped through the edit form without loss.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Parses and formats delimited value strings for a fixed list of fields.
///
/// A parser built for `["height", "width", "depth"]` reads
/// `"9 x 3 x 2 inches"` into three values plus a units string.
#[derive(Clone, Copy, Debug)]
pub struct UnitParser {
    fields: &'static [&'static str],
}

/// A parsed unit string: one value per field, in field order, plus units.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub values: Vec<f64>,
    pub units: String,
}

impl UnitParser {
    /// Single-field parser used for edition weight (`"1.2 pounds"`).
    pub const WEIGHT: UnitParser = UnitParser { fields: &["value"] };

    /// Three-field parser used for physical dimensions
    /// (`"9 x 3 x 2 inches"`).
    pub const DIMENSIONS: UnitParser = UnitParser {
        fields: &["height", "width", "depth"],
    };

    pub fn new(fields: &'static [&'static str]) -> Self {
        Self { fields }
    }

    /// Render a measurement as `v1 x v2 x ... units`.
    pub fn format(&self, m: &Measurement) -> String {
        let values = m
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" x ");
        format!("{} {}", values, m.units)
    }

    /// Parse a unit string. Returns None when the text does not match the
    /// expected field count or the values are not decimal numbers.
    pub fn parse(&self, s: &str) -> Option<Measurement> {
        let pattern = format!(
            "^{} *(.*)$",
            self.fields
                .iter()
                .map(|_| "([0-9.]+)")
                .collect::<Vec<_>>()
                .join(" *x *")
        );
        // The pattern is built from a fixed field count and always compiles.
        let rx = Regex::new(&pattern).ok()?;
        let caps = rx.captures(s.trim())?;

        let mut values = Vec::with_capacity(self.fields.len());
        for i in 0..self.fields.len() {
            values.push(caps.get(i + 1)?.as_str().parse::<f64>().ok()?);
        }
        let units = caps.get(self.fields.len() + 1)?.as_str().trim().to_string();
        Some(Measurement { values, units })
    }
}

/// Edition weight, e.g. `1.2 pounds`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Weight {
    pub value: f64,
    pub units: String,
}

impl Weight {
    pub fn parse(s: &str) -> Option<Self> {
        let m = UnitParser::WEIGHT.parse(s)?;
        Some(Self {
            value: m.values[0],
            units: m.units,
        })
    }

    pub fn format(&self) -> String {
        UnitParser::WEIGHT.format(&Measurement {
            values: vec![self.value],
            units: self.units.clone(),
        })
    }
}

/// Physical dimensions of an edition, e.g. `9 x 3 x 2 inches`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Dimensions {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub units: String,
}

impl Dimensions {
    pub fn parse(s: &str) -> Option<Self> {
        let m = UnitParser::DIMENSIONS.parse(s)?;
        Some(Self {
            height: m.values[0],
            width: m.values[1],
            depth: m.values[2],
            units: m.units,
        })
    }

    pub fn format(&self) -> String {
        UnitParser::DIMENSIONS.format(&Measurement {
            values: vec![self.height, self.width, self.depth],
            units: self.units.clone(),
        })
    }
}
