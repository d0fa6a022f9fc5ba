//! Summary statistics
//!
//! Counts, grand total and top categories of one aggregate.

use serde::Serialize;

use crate::models::{Aggregate, CategoryTotals};

/// Headline numbers of an aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub category_count: usize,
    pub subcategory_count: usize,
    pub unit_type_count: usize,
    pub grand_total: f64,
    /// Largest categories by total, descending
    pub top_categories: Vec<(String, f64)>,
}

impl Summary {
    /// Compute the summary of an aggregate
    pub fn from_aggregate(aggregate: &Aggregate, top_n: usize) -> Self {
        let totals = aggregate.category_totals();
        Self {
            category_count: aggregate.category_count(),
            subcategory_count: aggregate.subcategory_count(),
            unit_type_count: aggregate.unit_type_count(),
            grand_total: totals.values().sum(),
            top_categories: top_categories(&totals, top_n),
        }
    }
}

/// The `n` categories with the largest totals
///
/// Sorted by total descending; equal totals are ordered by name.
pub fn top_categories(totals: &CategoryTotals, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = totals
        .iter()
        .map(|(category, total)| (category.clone(), *total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
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

    #[test]
    fn test_summary() {
        let summary = Summary::from_aggregate(
            &agg(&[
                ("Compute", "VM", "Hours", 15.0),
                ("Storage", "N/A", "GB", 3.0),
                ("Storage", "Blob", "GB", 1.0),
            ]),
            5,
        );
        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.subcategory_count, 3);
        assert_eq!(summary.unit_type_count, 3);
        assert_eq!(summary.grand_total, 19.0);
        assert_eq!(
            summary.top_categories,
            vec![("Compute".to_string(), 15.0), ("Storage".to_string(), 4.0)]
        );
    }

    #[test]
    fn test_top_categories_limit_and_ties() {
        let totals: CategoryTotals = [("b", 2.0), ("a", 2.0), ("c", 9.0), ("d", -1.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let top = top_categories(&totals, 3);
        let names: Vec<_> = top.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(top_categories(&totals, 0).is_empty());
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_aggregate(&Aggregate::new(), 5);
        assert_eq!(summary.category_count, 0);
        assert_eq!(summary.grand_total, 0.0);
        assert!(summary.top_categories.is_empty());
    }
}
