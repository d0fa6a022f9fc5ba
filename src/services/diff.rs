//! Aggregate comparison
//!
//! Structural, value-based comparison of two aggregates. Category change
//! detection is set based ([`ChangeSet`]); the detailed view pairs every
//! unit present on either side with its old and new totals. A missing
//! aggregate compares like an empty one.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{Aggregate, Subcategories};

/// Categories present on only one side, each list sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Present in the old aggregate only
    pub missing_categories: Vec<String>,
    /// Present in the new aggregate only
    pub added_categories: Vec<String>,
}

impl ChangeSet {
    /// Check if both aggregates have the same category keys
    pub fn is_empty(&self) -> bool {
        self.missing_categories.is_empty() && self.added_categories.is_empty()
    }
}

/// Where a category appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Old aggregate only
    Missing,
    /// New aggregate only
    Added,
    /// Both aggregates
    Both,
}

impl Presence {
    /// Lowercase label used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Missing => "missing",
            Presence::Added => "added",
            Presence::Both => "both",
        }
    }
}

/// Old and new totals of one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDelta {
    pub category: String,
    pub subcategory: String,
    pub unit: String,
    /// `0.0` when the unit is absent from the old aggregate
    pub old_total: f64,
    /// `0.0` when the unit is absent from the new aggregate
    pub new_total: f64,
    /// `new_total - old_total`
    pub delta: f64,
}

/// Unit deltas under one subcategory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryComparison {
    pub name: String,
    pub units: Vec<UnitDelta>,
}

/// Side-by-side view of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub name: String,
    pub presence: Presence,
    pub old_total: f64,
    pub new_total: f64,
    pub subcategories: Vec<SubcategoryComparison>,
}

impl CategoryComparison {
    /// Change of the category total
    pub fn delta(&self) -> f64 {
        self.new_total - self.old_total
    }
}

fn or_empty<'a>(aggregate: Option<&'a Aggregate>, empty: &'a Aggregate) -> &'a Aggregate {
    aggregate.unwrap_or(empty)
}

/// Compute the categories missing from and added to `new` relative to `old`
pub fn diff(old: Option<&Aggregate>, new: Option<&Aggregate>) -> ChangeSet {
    let empty = Aggregate::new();
    let old = or_empty(old, &empty);
    let new = or_empty(new, &empty);

    let old_keys: BTreeSet<&str> = old.categories().collect();
    let new_keys: BTreeSet<&str> = new.categories().collect();

    ChangeSet {
        missing_categories: old_keys
            .difference(&new_keys)
            .map(|c| c.to_string())
            .collect(),
        added_categories: new_keys
            .difference(&old_keys)
            .map(|c| c.to_string())
            .collect(),
    }
}

fn compare_category(
    name: &str,
    old: Option<&Subcategories>,
    new: Option<&Subcategories>,
) -> CategoryComparison {
    let presence = match (old.is_some(), new.is_some()) {
        (true, false) => Presence::Missing,
        (false, true) => Presence::Added,
        _ => Presence::Both,
    };

    let subcategory_names: BTreeSet<&str> = old
        .into_iter()
        .chain(new)
        .flat_map(|s| s.keys().map(String::as_str))
        .collect();

    let mut old_total = 0.0;
    let mut new_total = 0.0;
    let mut subcategories = Vec::with_capacity(subcategory_names.len());

    for subcategory in subcategory_names {
        let old_units = old.and_then(|s| s.get(subcategory));
        let new_units = new.and_then(|s| s.get(subcategory));
        let unit_names: BTreeSet<&str> = old_units
            .into_iter()
            .chain(new_units)
            .flat_map(|u| u.keys().map(String::as_str))
            .collect();

        let units: Vec<UnitDelta> = unit_names
            .into_iter()
            .map(|unit| {
                let old_amount = old_units.and_then(|u| u.get(unit)).copied().unwrap_or(0.0);
                let new_amount = new_units.and_then(|u| u.get(unit)).copied().unwrap_or(0.0);
                UnitDelta {
                    category: name.to_string(),
                    subcategory: subcategory.to_string(),
                    unit: unit.to_string(),
                    old_total: old_amount,
                    new_total: new_amount,
                    delta: new_amount - old_amount,
                }
            })
            .collect();

        old_total += units.iter().map(|u| u.old_total).sum::<f64>();
        new_total += units.iter().map(|u| u.new_total).sum::<f64>();
        subcategories.push(SubcategoryComparison {
            name: subcategory.to_string(),
            units,
        });
    }

    CategoryComparison {
        name: name.to_string(),
        presence,
        old_total,
        new_total,
        subcategories,
    }
}

/// Compare every category present on either side, sorted by name
pub fn compare(old: Option<&Aggregate>, new: Option<&Aggregate>) -> Vec<CategoryComparison> {
    let empty = Aggregate::new();
    let old = or_empty(old, &empty);
    let new = or_empty(new, &empty);

    let names: BTreeSet<&str> = old.categories().chain(new.categories()).collect();
    names
        .into_iter()
        .map(|name| compare_category(name, old.category(name), new.category(name)))
        .collect()
}

/// Every unit present on either side with its old total, new total and change
pub fn unit_deltas(old: Option<&Aggregate>, new: Option<&Aggregate>) -> Vec<UnitDelta> {
    compare(old, new)
        .into_iter()
        .flat_map(|c| c.subcategories)
        .flat_map(|s| s.units)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{aggregate, NormalizedEntry};

    fn agg(entries: &[(&str, &str, &str, f64)]) -> Aggregate {
        aggregate(entries.iter().map(|&(c, s, u, a)| NormalizedEntry {
            category: c.into(),
            subcategory: s.into(),
            unit: u.into(),
            amount: a,
        }))
    }

    fn old_new() -> (Aggregate, Aggregate) {
        let old = agg(&[
            ("A", "x", "Hours", 1.0),
            ("B", "y", "GB", 2.0),
            ("B", "y", "Hours", 4.0),
        ]);
        let new = agg(&[
            ("B", "y", "GB", 5.0),
            ("B", "z", "Count", 1.0),
            ("C", "w", "Hours", 3.0),
        ]);
        (old, new)
    }

    #[test]
    fn test_concrete_diff() {
        let (old, new) = old_new();
        let changes = diff(Some(&old), Some(&new));
        assert_eq!(changes.missing_categories, vec!["A"]);
        assert_eq!(changes.added_categories, vec!["C"]);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_diff_symmetry() {
        let (a, b) = old_new();
        let ab = diff(Some(&a), Some(&b));
        let ba = diff(Some(&b), Some(&a));
        assert_eq!(ab.missing_categories, ba.added_categories);
        assert_eq!(ab.added_categories, ba.missing_categories);
    }

    #[test]
    fn test_diff_identity() {
        let (a, _) = old_new();
        assert!(diff(Some(&a), Some(&a)).is_empty());
    }

    #[test]
    fn test_missing_side_is_empty() {
        let (a, _) = old_new();
        let changes = diff(None, Some(&a));
        assert_eq!(changes.added_categories, vec!["A", "B"]);
        assert!(changes.missing_categories.is_empty());

        let changes = diff(Some(&a), None);
        assert_eq!(changes.missing_categories, vec!["A", "B"]);

        assert!(diff(None, None).is_empty());
        assert_eq!(diff(None, Some(&Aggregate::new())), ChangeSet::default());
    }

    #[test]
    fn test_case_sensitive_keys() {
        let old = agg(&[("compute", "x", "u", 1.0)]);
        let new = agg(&[("Compute", "x", "u", 1.0)]);
        let changes = diff(Some(&old), Some(&new));
        assert_eq!(changes.missing_categories, vec!["compute"]);
        assert_eq!(changes.added_categories, vec!["Compute"]);
    }

    #[test]
    fn test_whitespace_distinguishes_categories() {
        let old = agg(&[("Compute", "x", "u", 1.0)]);
        let new = agg(&[(" Compute", "x", "u", 1.0)]);
        let changes = diff(Some(&old), Some(&new));
        assert_eq!(changes.missing_categories, vec!["Compute"]);
        assert_eq!(changes.added_categories, vec![" Compute"]);
    }

    #[test]
    fn test_unit_deltas() {
        let (old, new) = old_new();
        let deltas = unit_deltas(Some(&old), Some(&new));
        let keys: Vec<_> = deltas
            .iter()
            .map(|d| (d.category.as_str(), d.subcategory.as_str(), d.unit.as_str(), d.delta))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("A", "x", "Hours", -1.0),
                ("B", "y", "GB", 3.0),
                ("B", "y", "Hours", -4.0),
                ("B", "z", "Count", 1.0),
                ("C", "w", "Hours", 3.0),
            ]
        );
        assert_eq!(deltas[2].old_total, 4.0);
        assert_eq!(deltas[2].new_total, 0.0);
    }

    #[test]
    fn test_zero_deltas_are_reported() {
        let (a, _) = old_new();
        let deltas = unit_deltas(Some(&a), Some(&a));
        assert_eq!(deltas.len(), 3);
        assert!(deltas.iter().all(|d| d.delta == 0.0));
    }

    #[test]
    fn test_category_comparison() {
        let (old, new) = old_new();
        let comparisons = compare(Some(&old), Some(&new));
        let names: Vec<_> = comparisons.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert_eq!(comparisons[0].presence, Presence::Missing);
        assert_eq!(comparisons[1].presence, Presence::Both);
        assert_eq!(comparisons[2].presence, Presence::Added);

        let b = &comparisons[1];
        assert_eq!(b.old_total, 6.0);
        assert_eq!(b.new_total, 6.0);
        assert_eq!(b.delta(), 0.0);
        let subs: Vec<_> = b.subcategories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, vec!["y", "z"]);
    }

    #[test]
    fn test_equal_totals_with_different_breakdown_is_not_a_category_change() {
        let old = agg(&[("A", "x", "u", 2.0)]);
        let new = agg(&[("A", "y", "v", 2.0)]);
        assert!(diff(Some(&old), Some(&new)).is_empty());
        assert_eq!(unit_deltas(Some(&old), Some(&new)).len(), 2);
    }
}
