//! Single-file analysis report
//!
//! Renders one aggregate as a category/subcategory/unit breakdown followed
//! by a summary block and the top categories.

use crate::display::{format_amount, separator};
use crate::models::Aggregate;
use crate::services::analysis::{Analysis, ImportStats};

use super::summary::Summary;
use super::Rendered;

const WIDTH: usize = 80;
const CATEGORY_RULE: usize = 60;

/// Text report of one analyzed source
#[derive(Debug, Clone)]
pub struct SingleReport<'a> {
    source_name: &'a str,
    aggregate: &'a Aggregate,
    stats: Option<ImportStats>,
    top_n: usize,
}

impl<'a> SingleReport<'a> {
    /// Report on a bare aggregate
    pub fn new(source_name: &'a str, aggregate: &'a Aggregate, top_n: usize) -> Self {
        Self {
            source_name,
            aggregate,
            stats: None,
            top_n,
        }
    }

    /// Report on an analysis, including its row counts
    pub fn from_analysis(analysis: &'a Analysis, top_n: usize) -> Self {
        Self {
            source_name: &analysis.source_name,
            aggregate: &analysis.aggregate,
            stats: Some(analysis.stats),
            top_n,
        }
    }

    /// Summary statistics of the report's aggregate
    pub fn summary(&self) -> Summary {
        Summary::from_aggregate(self.aggregate, self.top_n)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> Rendered {
        if self.aggregate.is_empty() {
            return Rendered::NoData;
        }

        let mut output = String::new();

        // Header
        output.push_str(&format!("{}\n", separator('=', WIDTH)));
        output.push_str("SERVICE USAGE ANALYSIS\n");
        output.push_str(&format!("{}\n", separator('=', WIDTH)));
        output.push_str(&format!("File: {}\n", self.source_name));
        if let Some(stats) = &self.stats {
            output.push_str(&format!(
                "Rows: {} read, {} used, {} skipped\n",
                stats.rows_read,
                stats.rows_used,
                stats.skipped()
            ));
        }
        output.push_str(&format!("{}\n", separator('=', WIDTH)));

        // Breakdown
        for (category, subcategories) in self.aggregate.iter() {
            output.push_str(&format!("\nSERVICE CATEGORY: {}\n", category));
            output.push_str(&format!("{}\n", separator('-', CATEGORY_RULE)));

            for (subcategory, units) in subcategories {
                output.push_str(&format!("  Subcategory: {}\n", subcategory));
                for (unit, total) in units {
                    output.push_str(&format!(
                        "    Unit: {} | Total Amount: {}\n",
                        unit,
                        format_amount(*total)
                    ));
                }
                output.push_str(&format!(
                    "    > Subcategory Total: {}\n\n",
                    format_amount(self.aggregate.subcategory_total(category, subcategory))
                ));
            }

            output.push_str(&format!(
                "  CATEGORY TOTAL: {}\n",
                format_amount(self.aggregate.category_total(category))
            ));
        }

        // Summary
        let summary = self.summary();
        output.push_str(&format!("\n{}\n", separator('=', WIDTH)));
        output.push_str("SUMMARY\n");
        output.push_str(&format!("{}\n", separator('=', WIDTH)));
        output.push_str(&format!(
            "Total Service Categories: {}\n",
            summary.category_count
        ));
        output.push_str(&format!(
            "Total Service Subcategories: {}\n",
            summary.subcategory_count
        ));
        output.push_str(&format!("Total Unit Types: {}\n", summary.unit_type_count));
        output.push_str(&format!(
            "Grand Total Amount: {}\n",
            format_amount(summary.grand_total)
        ));

        output.push_str("\nTop Categories by Total Amount:\n");
        for (rank, (category, total)) in summary.top_categories.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {}: {}\n",
                rank + 1,
                category,
                format_amount(*total)
            ));
        }

        Rendered::Report(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::services::analysis::analyze_reader;

    const CSV: &str = "service_category,service_sub_category,service_unit,total\n\
                       Storage,Blob,GB,1200.5\n\
                       Compute,VM,Hours,10\n\
                       Compute,VM,Hours,5\n\
                       Storage,,GB,3\n\
                       Compute,Batch,Hours,1\n";

    fn analysis() -> Analysis {
        analyze_reader("usage.csv", CSV.as_bytes(), &ColumnNames::default())
            .unwrap()
            .require_data()
            .unwrap()
    }

    #[test]
    fn test_format_terminal() {
        let analysis = analysis();
        let rendered = SingleReport::from_analysis(&analysis, 5).format_terminal();
        let text = rendered.text().unwrap();

        assert!(text.contains("File: usage.csv"));
        assert!(text.contains("Rows: 5 read, 5 used, 0 skipped"));
        assert!(text.contains("    Unit: Hours | Total Amount: 15.00"));
        assert!(text.contains("  Subcategory: N/A"));
        assert!(text.contains("  CATEGORY TOTAL: 1,203.50"));
        assert!(text.contains("Total Service Subcategories: 4"));
        assert!(text.contains("Grand Total Amount: 1,219.50"));
        assert!(text.contains("  1. Storage: 1,203.50\n  2. Compute: 16.00\n"));
    }

    #[test]
    fn test_sorted_output() {
        let analysis = analysis();
        let rendered = SingleReport::from_analysis(&analysis, 5).format_terminal();
        let text = rendered.text().unwrap();

        let compute = text.find("SERVICE CATEGORY: Compute").unwrap();
        let storage = text.find("SERVICE CATEGORY: Storage").unwrap();
        assert!(compute < storage);

        let batch = text.find("Subcategory: Batch").unwrap();
        let vm = text.find("Subcategory: VM").unwrap();
        assert!(batch < vm);
    }

    #[test]
    fn test_top_n_limit() {
        let analysis = analysis();
        let rendered = SingleReport::from_analysis(&analysis, 1).format_terminal();
        let text = rendered.text().unwrap();
        assert!(text.contains("  1. Storage"));
        assert!(!text.contains("  2. Compute"));
    }

    #[test]
    fn test_empty_aggregate_is_no_data() {
        let empty = Aggregate::new();
        let rendered = SingleReport::new("empty.csv", &empty, 5).format_terminal();
        assert!(rendered.is_no_data());
    }
}
