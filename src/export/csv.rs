//! CSV Export functionality
//!
//! Flattens an aggregate, or a comparison, to one row per unit.

use std::io::Write;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Aggregate;
use crate::reports::Comparison;

fn export_error(e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Export(e.to_string())
}

/// Export an aggregate as `category,subcategory,unit,total`
pub fn export_aggregate_csv<W: Write>(aggregate: &Aggregate, writer: &mut W) -> AnalyzerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["category", "subcategory", "unit", "total"])
        .map_err(export_error)?;

    for (category, subcategory, unit, total) in aggregate.entries() {
        let total = total.to_string();
        csv_writer
            .write_record([category, subcategory, unit, total.as_str()])
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)?;
    Ok(())
}

/// Export a comparison as one row per unit present on either side
///
/// `status` is the category-level presence: `missing`, `added` or `both`.
pub fn export_comparison_csv<W: Write>(
    comparison: &Comparison,
    writer: &mut W,
) -> AnalyzerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record([
            "category",
            "subcategory",
            "unit",
            "old_total",
            "new_total",
            "change",
            "status",
        ])
        .map_err(export_error)?;

    for category in comparison.categories() {
        for subcategory in &category.subcategories {
            for unit in &subcategory.units {
                let old_total = unit.old_total.to_string();
                let new_total = unit.new_total.to_string();
                let change = unit.delta.to_string();
                csv_writer
                    .write_record([
                        unit.category.as_str(),
                        unit.subcategory.as_str(),
                        unit.unit.as_str(),
                        old_total.as_str(),
                        new_total.as_str(),
                        change.as_str(),
                        category.presence.as_str(),
                    ])
                    .map_err(export_error)?;
            }
        }
    }

    csv_writer.flush().map_err(export_error)?;
    Ok(())
}
