//! Structured report document
//!
//! A paginated, printable view of a single analysis or a comparison. The
//! document is plain data (headings, paragraphs, bullet lists, tables) so the
//! same value can be rendered as paginated text or serialized to JSON/YAML.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::display::{format_amount, format_change, separator};
use crate::models::Aggregate;
use crate::services::diff::Presence;

use super::comparison::Comparison;
use super::summary::Summary;

/// Lines reserved on every text page for the blank line and the page footer
const FOOTER_LINES: usize = 2;

/// A label/value pair shown under the title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataField {
    pub label: String,
    pub value: String,
}

impl MetadataField {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// A table with a header row and an optional emphasised footer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Vec<String>>,
}

impl TableBlock {
    fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    fn row(mut self, cells: Vec<String>) -> Self {
        self.rows.push(cells);
        self
    }

    fn footer(mut self, cells: Vec<String>) -> Self {
        self.footer = Some(cells);
        self
    }

    /// Draw the table with ASCII borders
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.header.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }
        if let Some(footer) = &self.footer {
            builder.push_record(footer.iter().map(|cell| cell.to_uppercase()));
        }

        let mut table = builder.build();
        table.with(Style::ascii());
        table.to_string()
    }
}

/// One block of document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Bullets { items: Vec<String> },
    Table(TableBlock),
}

impl Section {
    fn heading(level: u8, text: impl Into<String>) -> Self {
        Section::Heading {
            level,
            text: text.into(),
        }
    }

    fn paragraph(text: impl Into<String>) -> Self {
        Section::Paragraph { text: text.into() }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            Section::Heading { level: 1, text } => {
                vec![text.to_uppercase(), separator('=', text.chars().count())]
            }
            Section::Heading { level: 2, text } => {
                vec![text.clone(), separator('-', text.chars().count())]
            }
            Section::Heading { text, .. } => vec![text.clone()],
            Section::Paragraph { text } => vec![text.clone()],
            Section::Bullets { items } => items.iter().map(|i| format!("  - {}", i)).collect(),
            Section::Table(table) => table.render().lines().map(str::to_string).collect(),
        }
    }
}

/// A logical page of sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub sections: Vec<Section>,
}

impl Page {
    fn push(&mut self, section: Section) {
        self.sections.push(section);
    }
}

/// A titled, paginated report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub metadata: Vec<MetadataField>,
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<Page>,
}

impl Document {
    /// Build the document for one analyzed source
    ///
    /// Returns `None` when the aggregate is empty.
    pub fn single(
        source_name: &str,
        aggregate: &Aggregate,
        top_n: usize,
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        if aggregate.is_empty() {
            return None;
        }

        let summary = Summary::from_aggregate(aggregate, top_n);

        let mut overview = Page::default();
        overview.push(Section::heading(1, "Summary"));
        overview.push(Section::Table(
            TableBlock::new(&["Metric", "Value"])
                .row(vec![
                    "Total Service Categories".into(),
                    summary.category_count.to_string(),
                ])
                .row(vec![
                    "Total Service Subcategories".into(),
                    summary.subcategory_count.to_string(),
                ])
                .row(vec![
                    "Total Unit Types".into(),
                    summary.unit_type_count.to_string(),
                ])
                .row(vec![
                    "Grand Total Amount".into(),
                    format_amount(summary.grand_total),
                ]),
        ));
        overview.push(Section::heading(
            2,
            format!("Top {} Categories by Total Amount", top_n),
        ));
        let mut top = TableBlock::new(&["Rank", "Category", "Total Amount"]);
        for (rank, (category, total)) in summary.top_categories.iter().enumerate() {
            top = top.row(vec![
                (rank + 1).to_string(),
                category.clone(),
                format_amount(*total),
            ]);
        }
        overview.push(Section::Table(top));

        let mut breakdown = Page::default();
        breakdown.push(Section::heading(1, "Detailed Breakdown"));
        for (category, subcategories) in aggregate.iter() {
            breakdown.push(Section::heading(2, format!("Service Category: {}", category)));
            for (subcategory, units) in subcategories {
                breakdown.push(Section::heading(3, format!("Subcategory: {}", subcategory)));
                let mut table = TableBlock::new(&["Unit", "Total Amount"]);
                for (unit, total) in units {
                    table = table.row(vec![unit.clone(), format_amount(*total)]);
                }
                breakdown.push(Section::Table(table.footer(vec![
                    "Subcategory Total".into(),
                    format_amount(aggregate.subcategory_total(category, subcategory)),
                ])));
            }
            breakdown.push(Section::paragraph(format!(
                "Category Total: {}",
                format_amount(aggregate.category_total(category))
            )));
        }

        Some(Self {
            title: "Service Usage Analysis Report".to_string(),
            metadata: vec![MetadataField::new("File", source_name)],
            generated_at,
            pages: vec![overview, breakdown],
        })
    }

    /// Build the document for a comparison
    ///
    /// Returns `None` when both sides are empty.
    pub fn comparison(
        comparison: &Comparison,
        top_n: usize,
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        if comparison.is_empty() {
            return None;
        }

        let old = Summary::from_aggregate(&comparison.old, top_n);
        let new = Summary::from_aggregate(&comparison.new, top_n);
        let count_row = |label: &str, old: usize, new: usize| {
            vec![
                label.to_string(),
                old.to_string(),
                new.to_string(),
                format!("{:+}", new as i64 - old as i64),
            ]
        };

        let mut overview = Page::default();
        overview.push(Section::heading(1, "Comparison Summary"));
        overview.push(Section::Table(
            TableBlock::new(&["Metric", "Old File", "New File", "Change"])
                .row(count_row(
                    "Service Categories",
                    old.category_count,
                    new.category_count,
                ))
                .row(count_row(
                    "Service Subcategories",
                    old.subcategory_count,
                    new.subcategory_count,
                ))
                .row(count_row(
                    "Unit Types",
                    old.unit_type_count,
                    new.unit_type_count,
                ))
                .row(vec![
                    "Grand Total Amount".into(),
                    format_amount(old.grand_total),
                    format_amount(new.grand_total),
                    format_change(new.grand_total - old.grand_total),
                ]),
        ));

        overview.push(Section::heading(2, "Service Changes"));
        let changes = comparison.changes();
        if changes.is_empty() {
            overview.push(Section::paragraph("No service changes detected"));
        } else {
            if !changes.missing_categories.is_empty() {
                overview.push(Section::paragraph(format!(
                    "Services missing from new file ({}):",
                    changes.missing_categories.len()
                )));
                overview.push(Section::Bullets {
                    items: changes.missing_categories.clone(),
                });
            }
            if !changes.added_categories.is_empty() {
                overview.push(Section::paragraph(format!(
                    "New services added ({}):",
                    changes.added_categories.len()
                )));
                overview.push(Section::Bullets {
                    items: changes.added_categories.clone(),
                });
            }
        }

        let mut details = Page::default();
        details.push(Section::heading(1, "Detailed Comparison"));
        for category in comparison.categories() {
            let marker = match category.presence {
                Presence::Missing => " (missing from new file)",
                Presence::Added => " (new service)",
                Presence::Both => "",
            };
            details.push(Section::heading(
                2,
                format!("Service Category: {}{}", category.name, marker),
            ));
            for subcategory in &category.subcategories {
                details.push(Section::heading(3, format!("Subcategory: {}", subcategory.name)));
                let mut table = TableBlock::new(&["Unit", "Old Amount", "New Amount", "Change"]);
                let (mut old_total, mut new_total) = (0.0, 0.0);
                for unit in &subcategory.units {
                    old_total += unit.old_total;
                    new_total += unit.new_total;
                    table = table.row(vec![
                        unit.unit.clone(),
                        format_amount(unit.old_total),
                        format_amount(unit.new_total),
                        format_change(unit.delta),
                    ]);
                }
                details.push(Section::Table(table.footer(vec![
                    "Subcategory Total".into(),
                    format_amount(old_total),
                    format_amount(new_total),
                    format_change(new_total - old_total),
                ])));
            }
            details.push(Section::paragraph(format!(
                "Category Total: {} -> {} ({})",
                format_amount(category.old_total),
                format_amount(category.new_total),
                format_change(category.delta())
            )));
        }

        Some(Self {
            title: "Service Usage Comparison Report".to_string(),
            metadata: vec![
                MetadataField::new("Old File", comparison.old_name.clone()),
                MetadataField::new("New File", comparison.new_name.clone()),
            ],
            generated_at,
            pages: vec![overview, details],
        })
    }

    /// Render as paginated text
    ///
    /// Logical pages longer than `page_height` lines are split. Pages are
    /// separated by a form feed and each ends with `Page i of n`.
    pub fn render_text(&self, page_height: usize) -> String {
        let body_height = page_height.max(FOOTER_LINES + 1) - FOOTER_LINES;

        let mut physical: Vec<Vec<String>> = Vec::new();
        for (index, page) in self.pages.iter().enumerate() {
            let mut lines = Vec::new();
            if index == 0 {
                lines.extend(self.title_lines());
            }
            for section in &page.sections {
                lines.extend(section.lines());
                lines.push(String::new());
            }
            while lines.last().is_some_and(|l| l.is_empty()) {
                lines.pop();
            }
            physical.extend(lines.chunks(body_height).map(<[String]>::to_vec));
        }

        let total = physical.len();
        physical
            .into_iter()
            .enumerate()
            .map(|(i, mut lines)| {
                lines.push(String::new());
                lines.push(format!("Page {} of {}", i + 1, total));
                lines.join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\x0c\n")
            + "\n"
    }

    fn title_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            separator('=', self.title.chars().count()),
        ];
        lines.extend(
            self.metadata
                .iter()
                .map(|field| format!("{}: {}", field.label, field.value)),
        );
        lines.push(format!(
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        lines.push(String::new());
        lines
    }

    /// Number of logical pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
