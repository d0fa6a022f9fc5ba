//! Three-level usage aggregate
//!
//! An [`Aggregate`] maps category → subcategory → unit → accumulated total.
//! It is produced once by an [`AggregateBuilder`] and read-only afterwards;
//! all totals and counts are derived on demand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::NormalizedEntry;

/// Unit → total under one subcategory
pub type UnitTotals = BTreeMap<String, f64>;

/// Subcategory → units under one category
pub type Subcategories = BTreeMap<String, UnitTotals>;

/// Category → total, derived from an [`Aggregate`]
pub type CategoryTotals = BTreeMap<String, f64>;

/// Nested category/subcategory/unit totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregate(BTreeMap<String, Subcategories>);

impl Aggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building an aggregate
    pub fn builder() -> AggregateBuilder {
        AggregateBuilder::default()
    }

    /// Fold entries into an aggregate
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = NormalizedEntry>,
    {
        let mut builder = Self::builder();
        for entry in entries {
            builder.add(entry);
        }
        builder.build()
    }

    /// Check if no entry was aggregated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Category names, ascending
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Check whether a category key exists
    pub fn contains_category(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Subcategories of one category
    pub fn category(&self, category: &str) -> Option<&Subcategories> {
        self.0.get(category)
    }

    /// Iterate categories with their subcategories, ascending
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Subcategories)> {
        self.0.iter().map(|(c, s)| (c.as_str(), s))
    }

    /// Flattened (category, subcategory, unit, total) view, ascending at every level
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str, f64)> {
        self.0.iter().flat_map(|(category, subcategories)| {
            subcategories.iter().flat_map(move |(subcategory, units)| {
                units.iter().map(move |(unit, total)| {
                    (category.as_str(), subcategory.as_str(), unit.as_str(), *total)
                })
            })
        })
    }

    /// Total of a single (category, subcategory, unit) triple
    pub fn unit_total(&self, category: &str, subcategory: &str, unit: &str) -> Option<f64> {
        self.0.get(category)?.get(subcategory)?.get(unit).copied()
    }

    /// Sum of all units under one subcategory
    pub fn subcategory_total(&self, category: &str, subcategory: &str) -> f64 {
        self.0
            .get(category)
            .and_then(|s| s.get(subcategory))
            .map(|units| units.values().sum())
            .unwrap_or(0.0)
    }

    /// Sum of all units under one category
    pub fn category_total(&self, category: &str) -> f64 {
        self.0
            .get(category)
            .map(sum_subcategories)
            .unwrap_or(0.0)
    }

    /// Per-category totals
    pub fn category_totals(&self) -> CategoryTotals {
        category_totals(self)
    }

    /// Number of categories
    pub fn category_count(&self) -> usize {
        self.0.len()
    }

    /// Number of subcategories, counted per category
    pub fn subcategory_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Number of distinct (category, subcategory, unit) triples
    pub fn unit_type_count(&self) -> usize {
        self.0
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Sum of every total in the aggregate
    pub fn grand_total(&self) -> f64 {
        self.0.values().map(sum_subcategories).sum()
    }
}

fn sum_subcategories(subcategories: &Subcategories) -> f64 {
    subcategories
        .values()
        .flat_map(BTreeMap::values)
        .sum()
}

/// Accumulates entries into an [`Aggregate`]
#[derive(Debug, Default)]
pub struct AggregateBuilder {
    inner: BTreeMap<String, Subcategories>,
    entries: usize,
}

impl AggregateBuilder {
    /// Add one entry, inserting zeroed levels on first use
    pub fn add(&mut self, entry: NormalizedEntry) {
        let NormalizedEntry {
            category,
            subcategory,
            unit,
            amount,
        } = entry;

        let subcategories = self.inner.entry(category).or_default();
        let units = subcategories.entry(subcategory).or_default();
        let total = units.entry(unit).or_insert(0.0);
        *total += amount;
        self.entries += 1;
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Check if nothing has been added
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Finish building
    pub fn build(self) -> Aggregate {
        Aggregate(self.inner)
    }
}

/// Fold normalized entries into an aggregate
pub fn aggregate<I>(entries: I) -> Aggregate
where
    I: IntoIterator<Item = NormalizedEntry>,
{
    Aggregate::from_entries(entries)
}

/// Sum all unit totals per category
pub fn category_totals(aggregate: &Aggregate) -> CategoryTotals {
    aggregate
        .iter()
        .map(|(category, subcategories)| (category.to_string(), sum_subcategories(subcategories)))
        .collect()
}
