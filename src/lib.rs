//! Keyed line sorting in Rust
//!
//! This crate sorts lines by a single column key using lexicographic, numeric,
//! human-readable-numeric or month ordering, and checks whether input is
//! already sorted in a single streaming pass.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;

pub mod input;
pub mod key;
pub mod compare;
pub mod core_sort;
pub mod check;

// Re-export commonly used types
pub use check::{check_sorted, is_sorted_lines, CheckOutcome};
pub use compare::compare_keys;
pub use config::{CheckMode, NumericMode, SortConfig, SortConfigBuilder};
pub use core_sort::{sort_lines, sort_records, CoreSort};
pub use error::{SortError, SortResult};
pub use key::{extract_column_value, extract_key, Key};

use tracing::debug;

/// Exit codes matching GNU sort
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const SORT_FAILURE: i32 = 2;

/// Main sort function that processes input according to configuration.
///
/// Accepts at most one input (none or `-` means stdin). Returns
/// [`EXIT_FAILURE`] when check mode finds a disorder.
pub fn sort(config: &SortConfig, input_files: &[String]) -> SortResult<i32> {
    if let Some(extra) = input_files.get(1) {
        return Err(SortError::extra_operand(extra));
    }
    config.validate()?;

    let source = input_files.first().map(String::as_str);
    debug!(
        key_column = config.key_column,
        numeric_mode = %config
            .numeric_mode()
            .map_or_else(|| "text".to_string(), |mode| mode.to_string()),
        month = config.month,
        reverse = config.reverse,
        unique = config.unique,
        check = ?config.check,
        "configuration resolved"
    );

    if config.checking() {
        let outcome = check::check_source(source, config)?;
        if config.check == CheckMode::Diagnose {
            if let Some(message) = outcome.message(source.unwrap_or(input::STDIN_NAME)) {
                eprintln!("{message}");
            }
        }
        return Ok(if outcome.is_sorted() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        });
    }

    CoreSort::new(config.clone()).sort(source)?;
    Ok(EXIT_SUCCESS)
}
