//! Core data models for the usage analyzer
//!
//! This module contains the records read from a usage export and the nested
//! aggregate they are folded into.

pub mod aggregate;
pub mod record;

pub use aggregate::{
    aggregate, category_totals, Aggregate, AggregateBuilder, CategoryTotals, Subcategories,
    UnitTotals,
};
pub use record::{normalize, Normalized, NormalizedEntry, Row, SkipReason, SENTINEL};
