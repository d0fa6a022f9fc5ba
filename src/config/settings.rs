//! User settings for the usage analyzer
//!
//! Manages user preferences including the report layout, the number of top
//! categories to list, pagination, and the names of the required CSV columns.

use serde::{Deserialize, Serialize};

use super::paths::AnalyzerPaths;
use crate::error::AnalyzerError;

/// How a two-file comparison is laid out in text output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonLayout {
    /// Old and new blocks one after the other, per category
    #[default]
    Unified,
    /// Old and new blocks in two columns
    SideBySide,
}

/// Header names of the four required CSV columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_category_column")]
    pub category: String,
    #[serde(default = "default_subcategory_column")]
    pub subcategory: String,
    #[serde(default = "default_unit_column")]
    pub unit: String,
    #[serde(default = "default_amount_column")]
    pub amount: String,
}

impl ColumnNames {
    /// Required names in the order they are reported when missing
    pub fn required(&self) -> [&str; 4] {
        [&self.category, &self.subcategory, &self.unit, &self.amount]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            category: default_category_column(),
            subcategory: default_subcategory_column(),
            unit: default_unit_column(),
            amount: default_amount_column(),
        }
    }
}

fn default_category_column() -> String {
    "service_category".to_string()
}

fn default_subcategory_column() -> String {
    "service_sub_category".to_string()
}

fn default_unit_column() -> String {
    "service_unit".to_string()
}

fn default_amount_column() -> String {
    "total".to_string()
}

/// User settings for the usage analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Number of categories listed in "top categories" sections
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Default layout for text comparisons
    #[serde(default)]
    pub comparison_layout: ComparisonLayout,

    /// Width of one column in the side-by-side layout
    #[serde(default = "default_column_width")]
    pub column_width: usize,

    /// Maximum number of lines per page in paginated document output
    #[serde(default = "default_page_height")]
    pub page_height: usize,

    /// Required CSV column names
    #[serde(default)]
    pub columns: ColumnNames,
}

fn default_schema_version() -> u32 {
    1
}

fn default_top_categories() -> usize {
    5
}

fn default_column_width() -> usize {
    80
}

fn default_page_height() -> usize {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            top_categories: default_top_categories(),
            comparison_layout: ComparisonLayout::default(),
            column_width: default_column_width(),
            page_height: default_page_height(),
            columns: ColumnNames::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AnalyzerPaths) -> Result<Self, AnalyzerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                AnalyzerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AnalyzerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            log::debug!("loaded settings from {}", settings_path.display());
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AnalyzerPaths) -> Result<(), AnalyzerError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AnalyzerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            AnalyzerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.top_categories, 5);
        assert_eq!(settings.comparison_layout, ComparisonLayout::Unified);
        assert_eq!(settings.column_width, 80);
        assert_eq!(
            settings.columns.required(),
            ["service_category", "service_sub_category", "service_unit", "total"]
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AnalyzerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.comparison_layout = ComparisonLayout::SideBySide;
        settings.top_categories = 3;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.comparison_layout, ComparisonLayout::SideBySide);
        assert_eq!(loaded.top_categories, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AnalyzerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"comparison_layout": "side-by-side", "columns": {"amount": "cost"}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.comparison_layout, ComparisonLayout::SideBySide);
        assert_eq!(loaded.columns.amount, "cost");
        assert_eq!(loaded.columns.category, "service_category");
        assert_eq!(loaded.page_height, 60);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AnalyzerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));
    }
}
