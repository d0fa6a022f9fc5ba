//! Two-file comparison report
//!
//! Compares an old and a new aggregate. The unified layout prints the old
//! and new blocks of each category one after the other; the side-by-side
//! layout prints them in two columns. Either layout can append the per-unit
//! change table.

use serde::Serialize;

use crate::config::ComparisonLayout;
use crate::display::{format_amount, format_change, left_align, separator, side_by_side};
use crate::models::{Aggregate, Subcategories};
use crate::services::analysis::AnalysisOutcome;
use crate::services::diff::{self, CategoryComparison, ChangeSet, UnitDelta};

use super::summary::Summary;
use super::Rendered;

const CATEGORY_RULE: usize = 60;

/// An old and a new aggregate with their source names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub old_name: String,
    pub new_name: String,
    pub old: Aggregate,
    pub new: Aggregate,
}

impl Comparison {
    /// Pair two aggregates
    pub fn new(
        old_name: impl Into<String>,
        old: Aggregate,
        new_name: impl Into<String>,
        new: Aggregate,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            old,
            new,
        }
    }

    /// Pair two analysis outcomes; a side without usable data compares as empty
    pub fn from_outcomes(old: AnalysisOutcome, new: AnalysisOutcome) -> Self {
        let old_name = old.source_name().to_string();
        let new_name = new.source_name().to_string();
        Self::new(old_name, old.into_aggregate(), new_name, new.into_aggregate())
    }

    /// Check if neither side has data
    pub fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }

    /// Categories missing from and added to the new side
    pub fn changes(&self) -> ChangeSet {
        diff::diff(Some(&self.old), Some(&self.new))
    }

    /// Per-category side-by-side view
    pub fn categories(&self) -> Vec<CategoryComparison> {
        diff::compare(Some(&self.old), Some(&self.new))
    }

    /// Every unit with its old total, new total and change
    pub fn unit_deltas(&self) -> Vec<UnitDelta> {
        diff::unit_deltas(Some(&self.old), Some(&self.new))
    }
}

/// Text report of a comparison
#[derive(Debug, Clone)]
pub struct ComparisonReport<'a> {
    comparison: &'a Comparison,
    layout: ComparisonLayout,
    column_width: usize,
    top_n: usize,
    details: bool,
}

impl<'a> ComparisonReport<'a> {
    /// Create a report with the unified layout
    pub fn new(comparison: &'a Comparison, top_n: usize) -> Self {
        Self {
            comparison,
            layout: ComparisonLayout::Unified,
            column_width: 80,
            top_n,
            details: false,
        }
    }

    /// Set the layout
    pub fn with_layout(mut self, layout: ComparisonLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the width of one column in the side-by-side layout
    pub fn with_column_width(mut self, width: usize) -> Self {
        self.column_width = width.max(20);
        self
    }

    /// Append the per-unit change table
    pub fn with_details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> Rendered {
        if self.comparison.is_empty() {
            return Rendered::NoData;
        }

        let mut lines = match self.layout {
            ComparisonLayout::Unified => self.unified_lines(),
            ComparisonLayout::SideBySide => self.side_by_side_lines(),
        };
        if self.details {
            lines.extend(self.detail_lines());
        }

        let rule_width = self.rule_width();
        lines.push(String::new());
        lines.push(separator('=', rule_width));
        lines.push("COMPARISON COMPLETE".to_string());
        lines.push(separator('=', rule_width));

        let mut output = lines.join("\n");
        output.push('\n');
        Rendered::Report(output)
    }

    fn rule_width(&self) -> usize {
        match self.layout {
            ComparisonLayout::Unified => self.column_width,
            ComparisonLayout::SideBySide => self.column_width * 2 + 3,
        }
    }

    fn header_lines(&self) -> Vec<String> {
        let rule = separator('=', self.rule_width());
        let mut lines = vec![
            rule.clone(),
            "SERVICE USAGE COMPARISON".to_string(),
            rule.clone(),
        ];
        match self.layout {
            ComparisonLayout::Unified => {
                lines.push(format!("OLD FILE: {}", self.comparison.old_name));
                lines.push(format!("NEW FILE: {}", self.comparison.new_name));
                lines.push(rule);
            }
            ComparisonLayout::SideBySide => {
                let old = vec![format!("OLD FILE: {}", self.comparison.old_name)];
                let new = vec![format!("NEW FILE: {}", self.comparison.new_name)];
                lines.extend(side_by_side(&old, &new, self.column_width));
                lines.push(self.column_rule());
            }
        }
        lines
    }

    fn column_rule(&self) -> String {
        format!(
            "{} | {}",
            separator('-', self.column_width),
            separator('-', self.column_width)
        )
    }

    /// Subcategory/unit lines of one side of a category
    fn breakdown_lines(subcategories: &Subcategories, total: f64) -> Vec<String> {
        let mut lines = Vec::new();
        for (subcategory, units) in subcategories {
            lines.push(format!("  {}", subcategory));
            for (unit, amount) in units {
                lines.push(format!("    {}: {}", unit, format_amount(*amount)));
            }
        }
        lines.push(format!("  TOTAL: {}", format_amount(total)));
        lines
    }

    fn unified_lines(&self) -> Vec<String> {
        let comparison = self.comparison;
        let mut lines = self.header_lines();

        for category in comparison.categories() {
            let name = category.name.as_str();
            lines.push(String::new());
            lines.push(format!("SERVICE CATEGORY: {}", name));
            lines.push(separator('-', CATEGORY_RULE));

            lines.push("OLD FILE:".to_string());
            match comparison.old.category(name) {
                Some(subcategories) => {
                    lines.extend(Self::breakdown_lines(subcategories, category.old_total))
                }
                None => lines.push("  MISSING".to_string()),
            }

            lines.push("NEW FILE:".to_string());
            match comparison.new.category(name) {
                Some(subcategories) => {
                    if comparison.old.category(name).is_none() {
                        lines.push("  NEW SERVICE".to_string());
                    }
                    lines.extend(Self::breakdown_lines(subcategories, category.new_total));
                }
                None => lines.push("  MISSING".to_string()),
            }
        }

        let old_summary = Summary::from_aggregate(&comparison.old, self.top_n);
        let new_summary = Summary::from_aggregate(&comparison.new, self.top_n);
        let rule = separator('=', self.rule_width());
        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("COMPARISON SUMMARY".to_string());
        lines.push(rule);
        lines.push("FILE STATISTICS:".to_string());
        for (label, summary) in [("OLD FILE", &old_summary), ("NEW FILE", &new_summary)] {
            lines.push(format!(
                "{} - Categories: {}, Subcategories: {}, Total: {}",
                label,
                summary.category_count,
                summary.subcategory_count,
                format_amount(summary.grand_total)
            ));
        }

        lines.push(String::new());
        lines.push("SERVICE CHANGES:".to_string());
        lines.extend(change_lines(&comparison.changes()));
        lines
    }

    fn side_by_side_lines(&self) -> Vec<String> {
        let comparison = self.comparison;
        let width = self.column_width;
        let mut lines = self.header_lines();

        for category in comparison.categories() {
            let name = category.name.as_str();

            let left = match comparison.old.category(name) {
                Some(subcategories) => {
                    let mut block = vec![name.to_string()];
                    block.extend(Self::breakdown_lines(subcategories, category.old_total));
                    block
                }
                None => vec![format!("{} (MISSING)", name)],
            };
            let right = match comparison.new.category(name) {
                Some(subcategories) => {
                    let title = if comparison.old.category(name).is_none() {
                        format!("{} (NEW)", name)
                    } else {
                        name.to_string()
                    };
                    let mut block = vec![title];
                    block.extend(Self::breakdown_lines(subcategories, category.new_total));
                    block
                }
                None => vec![format!("{} (MISSING)", name)],
            };

            lines.extend(side_by_side(&left, &right, width));
            lines.push(self.column_rule());
        }

        // Summary side by side
        let old_summary = Summary::from_aggregate(&comparison.old, self.top_n);
        let new_summary = Summary::from_aggregate(&comparison.new, self.top_n);
        let rule = separator('=', self.rule_width());
        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("COMPARISON SUMMARY".to_string());
        lines.push(rule);
        let summary_block = |title: &str, s: &Summary| {
            vec![
                title.to_string(),
                format!("Service Categories: {}", s.category_count),
                format!("Service Subcategories: {}", s.subcategory_count),
                format!("Unit Types: {}", s.unit_type_count),
                format!("Grand Total Amount: {}", format_amount(s.grand_total)),
            ]
        };
        lines.extend(side_by_side(
            &summary_block("OLD FILE SUMMARY", &old_summary),
            &summary_block("NEW FILE SUMMARY", &new_summary),
            width,
        ));

        // Service changes
        lines.push(String::new());
        lines.push(separator('=', width));
        lines.push("SERVICE CHANGES".to_string());
        lines.push(separator('=', width));
        lines.extend(change_lines(&comparison.changes()));

        // Top categories
        let half = (width / 2).max(20);
        lines.push(String::new());
        lines.push(separator('=', width));
        lines.push("TOP CATEGORIES COMPARISON".to_string());
        lines.push(separator('=', width));
        let top_block = |title: String, s: &Summary| {
            let mut block = vec![title];
            block.extend(
                s.top_categories
                    .iter()
                    .enumerate()
                    .map(|(i, (c, t))| format!("{}. {}: {}", i + 1, c, format_amount(*t))),
            );
            block
        };
        let mut top = side_by_side(
            &top_block(format!("OLD FILE - TOP {}", self.top_n), &old_summary),
            &top_block(format!("NEW FILE - TOP {}", self.top_n), &new_summary),
            half,
        );
        if !top.is_empty() {
            top.insert(
                1,
                format!("{} | {}", separator('-', half), separator('-', half)),
            );
        }
        lines.extend(top);
        lines
    }

    fn detail_lines(&self) -> Vec<String> {
        let rule = separator('=', self.rule_width());
        let mut lines = vec![
            String::new(),
            rule.clone(),
            "DETAILED CHANGES".to_string(),
            rule,
        ];

        for category in self.comparison.categories() {
            lines.push(String::new());
            lines.push(format!(
                "{} ({} -> {}, {})",
                category.name,
                format_amount(category.old_total),
                format_amount(category.new_total),
                format_change(category.delta())
            ));
            for subcategory in &category.subcategories {
                lines.push(format!("  {}", subcategory.name));
                lines.push(format!(
                    "    {} {:>15} {:>15} {:>15}",
                    left_align("Unit", 30),
                    "Old Amount",
                    "New Amount",
                    "Change"
                ));
                for unit in &subcategory.units {
                    lines.push(format!(
                        "    {} {:>15} {:>15} {:>15}",
                        left_align(&unit.unit, 30),
                        format_amount(unit.old_total),
                        format_amount(unit.new_total),
                        format_change(unit.delta)
                    ));
                }
            }
        }
        lines
    }
}

/// Missing/added category listing shared by both layouts
fn change_lines(changes: &ChangeSet) -> Vec<String> {
    let mut lines = Vec::new();
    if changes.missing_categories.is_empty() {
        lines.push("No services missing from new file".to_string());
    } else {
        lines.push(format!(
            "SERVICES MISSING FROM NEW FILE ({}):",
            changes.missing_categories.len()
        ));
        lines.extend(changes.missing_categories.iter().map(|c| format!("  - {}", c)));
    }

    lines.push(String::new());
    if changes.added_categories.is_empty() {
        lines.push("No new services added".to_string());
    } else {
        lines.push(format!(
            "NEW SERVICES ADDED ({}):",
            changes.added_categories.len()
        ));
        lines.extend(changes.added_categories.iter().map(|c| format!("  + {}", c)));
    }
    lines
}
