//! Display formatting for terminal output
//!
//! Provides utilities for formatting amounts and laying out columns.

pub mod format;

pub use format::{format_amount, format_change, left_align, separator, side_by_side, truncate};
