//! Usage rows and their normalization
//!
//! A [`Row`] is one raw CSV record. [`normalize`] turns it into a clean
//! [`NormalizedEntry`] or a [`SkipReason`]; skipping is a filtering decision,
//! never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a subcategory or unit is missing
pub const SENTINEL: &str = "N/A";

/// Spellings treated as "no value" in any field
const MISSING_MARKERS: &[&str] = &[
    "", "nan", "NaN", "-nan", "-NaN", "NA", "N/A", "n/a", "NULL", "null", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// A raw usage record, as read from the source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// 1-based data line number (header excluded)
    pub line: usize,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    /// Raw amount text; parsed during normalization
    pub amount: Option<String>,
}

impl Row {
    /// Build a row from borrowed field values
    pub fn new(
        category: Option<&str>,
        subcategory: Option<&str>,
        unit: Option<&str>,
        amount: Option<&str>,
    ) -> Self {
        Self {
            line: 0,
            category: category.map(str::to_string),
            subcategory: subcategory.map(str::to_string),
            unit: unit.map(str::to_string),
            amount: amount.map(str::to_string),
        }
    }

    /// Set the source line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// A clean (category, subcategory, unit, amount) tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub category: String,
    pub subcategory: String,
    pub unit: String,
    pub amount: f64,
}

/// Why a row was excluded from aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Category is null, blank, or a missing-value marker
    MissingCategory,
    /// Amount is missing or not a finite number
    InvalidAmount,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCategory => write!(f, "missing category"),
            SkipReason::InvalidAmount => write!(f, "invalid amount"),
        }
    }
}

/// Result of normalizing one row
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Entry(NormalizedEntry),
    Skip(SkipReason),
}

impl Normalized {
    /// Get the entry, if the row was kept
    pub fn entry(self) -> Option<NormalizedEntry> {
        match self {
            Normalized::Entry(entry) => Some(entry),
            Normalized::Skip(_) => None,
        }
    }
}

/// Trimmed field text, or `None` when the field holds no value
fn present(field: Option<&str>) -> Option<&str> {
    let value = field?.trim();
    if MISSING_MARKERS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

/// Subcategory/unit value with sentinel substitution
///
/// | input                       | output        |
/// |-----------------------------|---------------|
/// | `None`                      | `"N/A"`       |
/// | blank after trimming        | `"N/A"`       |
/// | missing-value marker        | `"N/A"`       |
/// | any other text              | trimmed text  |
pub fn label_or_sentinel(field: Option<&str>) -> String {
    present(field).unwrap_or(SENTINEL).to_string()
}

/// Parse an amount field as a finite number
pub fn parse_amount(field: Option<&str>) -> Option<f64> {
    let value = present(field)?;
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize one row
///
/// The category is checked for a value after trimming, but the key is the
/// field text as read, so `" Compute"` and `"Compute"` stay distinct.
pub fn normalize(row: &Row) -> Normalized {
    let Some(category) = row
        .category
        .as_deref()
        .filter(|c| present(Some(*c)).is_some())
    else {
        return Normalized::Skip(SkipReason::MissingCategory);
    };
    let Some(amount) = parse_amount(row.amount.as_deref()) else {
        return Normalized::Skip(SkipReason::InvalidAmount);
    };

    Normalized::Entry(NormalizedEntry {
        category: category.to_string(),
        subcategory: label_or_sentinel(row.subcategory.as_deref()),
        unit: label_or_sentinel(row.unit.as_deref()),
        amount,
    })
}
