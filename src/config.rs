//! Configuration management for sort operations

use crate::error::{SortError, SortResult};
use std::str::FromStr;

/// Default column delimiter
pub const DEFAULT_DELIMITER: &str = "\t";

/// How check mode reports its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Sort normally
    #[default]
    Off,
    /// Check sortedness and report the first bad line
    Diagnose,
    /// Check sortedness, exit status only
    Quiet,
}

/// Which numeric grammar applies to keys, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericMode {
    /// Plain decimal floating point
    Plain,
    /// Decimal with an optional B/K/M/G/T binary unit suffix
    Human,
}

/// Main configuration structure for sort operations.
///
/// Resolved once before any input is read and then shared by reference
/// with the extractor, comparator, sorter and verifier.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Column to sort by (0 = whole line, otherwise 1-based)
    pub key_column: usize,
    /// Column delimiter, may be longer than one character
    pub delimiter: String,
    /// Compare keys as plain numbers
    pub numeric: bool,
    /// Compare keys as human-readable sizes (takes precedence over `numeric`)
    pub human_numeric: bool,
    /// Compare keys by month abbreviation first
    pub month: bool,
    /// Reverse the result of comparisons
    pub reverse: bool,
    /// Output only the first of an equal run
    pub unique: bool,
    /// Strip trailing spaces and tabs from keys
    pub ignore_trailing_blanks: bool,
    /// Check if input is already sorted instead of sorting
    pub check: CheckMode,
    /// Output file path
    pub output_file: Option<String>,
    /// Debug mode (verbose diagnostics on stderr)
    pub debug: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key_column: 0,
            delimiter: DEFAULT_DELIMITER.to_string(),
            numeric: false,
            human_numeric: false,
            month: false,
            reverse: false,
            unique: false,
            ignore_trailing_blanks: false,
            check: CheckMode::Off,
            output_file: None,
            debug: false,
        }
    }
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key column
    pub fn with_key_column(mut self, column: usize) -> Self {
        self.key_column = column;
        self
    }

    /// Set the column delimiter
    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    /// Enable plain numeric comparison
    pub fn with_numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// Enable human-numeric comparison
    pub fn with_human_numeric(mut self, human_numeric: bool) -> Self {
        self.human_numeric = human_numeric;
        self
    }

    /// Enable month comparison
    pub fn with_month(mut self, month: bool) -> Self {
        self.month = month;
        self
    }

    /// Enable reverse sorting
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Enable unique output
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Strip trailing blanks from keys
    pub fn with_ignore_trailing_blanks(mut self, ignore: bool) -> Self {
        self.ignore_trailing_blanks = ignore;
        self
    }

    /// Set check mode
    pub fn with_check(mut self, check: CheckMode) -> Self {
        self.check = check;
        self
    }

    /// Set output file
    pub fn with_output_file(mut self, output_file: Option<String>) -> Self {
        self.output_file = output_file;
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> SortResult<()> {
        if self.key_column > 0 && self.delimiter.is_empty() {
            return Err(SortError::invalid_field_separator(
                "empty delimiter cannot separate columns",
            ));
        }

        Ok(())
    }

    /// The numeric grammar in effect; human-numeric wins when both are set
    pub fn numeric_mode(&self) -> Option<NumericMode> {
        if self.human_numeric {
            Some(NumericMode::Human)
        } else if self.numeric {
            Some(NumericMode::Plain)
        } else {
            None
        }
    }

    /// Check if sortedness checking replaces sorting
    pub fn checking(&self) -> bool {
        self.check != CheckMode::Off
    }
}

impl FromStr for NumericMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "n" => Ok(NumericMode::Plain),
            "human-numeric" | "h" => Ok(NumericMode::Human),
            _ => Err(SortError::internal(&format!("unknown numeric mode: {s}"))),
        }
    }
}

impl std::fmt::Display for NumericMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NumericMode::Plain => "numeric",
            NumericMode::Human => "human-numeric",
        };
        write!(f, "{name}")
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    /// Sort by the given column (0 = whole line)
    pub fn key_column(mut self, column: usize) -> Self {
        self.config.key_column = column;
        self
    }

    /// Set the column delimiter
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.config.delimiter = delimiter.to_string();
        self
    }

    /// Select a numeric grammar
    pub fn numeric_mode(mut self, mode: NumericMode) -> Self {
        match mode {
            NumericMode::Plain => self.config.numeric = true,
            NumericMode::Human => self.config.human_numeric = true,
        }
        self
    }

    /// Enable month comparison
    pub fn month(mut self) -> Self {
        self.config.month = true;
        self
    }

    /// Enable reverse sorting
    pub fn reverse(mut self) -> Self {
        self.config.reverse = true;
        self
    }

    /// Enable unique output
    pub fn unique(mut self) -> Self {
        self.config.unique = true;
        self
    }

    /// Strip trailing blanks from keys
    pub fn ignore_trailing_blanks(mut self) -> Self {
        self.config.ignore_trailing_blanks = true;
        self
    }

    /// Check instead of sorting
    pub fn check(mut self, mode: CheckMode) -> Self {
        self.config.check = mode;
        self
    }

    /// Set output file
    pub fn output_file(mut self, file: String) -> Self {
        self.config.output_file = Some(file);
        self
    }

    /// Enable debug diagnostics
    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SortResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset configurations for common use cases
pub mod presets {
    use super::*;

    /// Configuration for numeric sorting
    pub fn numeric() -> SortConfig {
        SortConfig::new().with_numeric(true)
    }

    /// Configuration for human-readable sizes
    pub fn human_numeric() -> SortConfig {
        SortConfig::new().with_human_numeric(true)
    }

    /// Configuration for month names
    pub fn month() -> SortConfig {
        SortConfig::new().with_month(true)
    }

    /// Configuration for sorting with unique output
    pub fn unique() -> SortConfig {
        SortConfig::new().with_unique(true)
    }

    /// Configuration for reverse sorting
    pub fn reverse() -> SortConfig {
        SortConfig::new().with_reverse(true)
    }

    /// Configuration for check mode
    pub fn check() -> SortConfig {
        SortConfig::new().with_check(CheckMode::Diagnose)
    }
}
