//! usage-analyzer - Aggregate and compare cloud service usage exports
//!
//! This library reads service usage CSV files, folds every usable row into a
//! category → subcategory → unit → total aggregate, and compares two
//! aggregates to find services that disappeared or appeared.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Rows, normalization and the aggregate
//! - `services`: CSV reading, analysis, comparison, session and worker
//! - `display`: Amount formatting and column layout
//! - `reports`: Text reports and the structured document
//! - `export`: CSV, JSON and YAML output
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use usage_analyzer::config::ColumnNames;
//! use usage_analyzer::services::analyze_file;
//!
//! let outcome = analyze_file(Path::new("usage.csv"), &ColumnNames::default())?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::AnalyzerError;
