//! Streaming sortedness check.
//!
//! Reads one record at a time and keeps only the previous line, so memory
//! use stays constant no matter how large the input is.

use crate::compare::compare_keys;
use crate::config::SortConfig;
use crate::error::{SortContext, SortResult};
use crate::input::{open_input, RecordReader, STDIN_NAME};
use crate::key::Key;
use std::cmp::Ordering;
use std::io::BufRead;
use tracing::debug;

/// Result of a sortedness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Every adjacent pair is in order
    Sorted,
    /// First out-of-order line (1-based) and its text
    Disorder { line: usize, text: String },
}

impl CheckOutcome {
    pub fn is_sorted(&self) -> bool {
        matches!(self, CheckOutcome::Sorted)
    }

    /// 1-based number of the offending line, if any
    pub fn violation_line(&self) -> Option<usize> {
        match self {
            CheckOutcome::Sorted => None,
            CheckOutcome::Disorder { line, .. } => Some(*line),
        }
    }

    /// Disorder message in `sort: FILE:LINE: disorder: TEXT` form
    pub fn message(&self, source: &str) -> Option<String> {
        match self {
            CheckOutcome::Sorted => None,
            CheckOutcome::Disorder { line, text } => {
                Some(format!("sort: {source}:{line}: disorder: {text}"))
            }
        }
    }
}

/// Whether `curr` may not follow `prev` under `config`.
///
/// With unique output requested, an equal key is also out of order.
#[inline]
pub fn is_out_of_order(prev: &Key, curr: &Key, config: &SortConfig) -> bool {
    match compare_keys(prev, curr, config) {
        Ordering::Greater => true,
        Ordering::Equal => config.unique,
        Ordering::Less => false,
    }
}

/// Check a stream of lines, stopping at the first violation
pub fn check_sorted<R: BufRead>(reader: R, config: &SortConfig) -> SortResult<CheckOutcome> {
    let mut records = RecordReader::new(reader);
    let mut prev = Vec::new();
    let mut curr = Vec::new();

    if !records
        .read_record(&mut prev)
        .with_context(|| "reading line 1".to_string())?
    {
        return Ok(CheckOutcome::Sorted);
    }

    let mut line = 1;
    while records
        .read_record(&mut curr)
        .with_context(|| format!("reading line {}", line + 1))?
    {
        line += 1;
        let prev_key = Key::extract(&prev, config);
        let curr_key = Key::extract(&curr, config);
        if is_out_of_order(&prev_key, &curr_key, config) {
            debug!(line, "disorder found");
            return Ok(CheckOutcome::Disorder {
                line,
                text: String::from_utf8_lossy(&curr).into_owned(),
            });
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    debug!(lines = line, "input is sorted");
    Ok(CheckOutcome::Sorted)
}

/// Check one source; `None` or `-` means stdin
pub fn check_source(source: Option<&str>, config: &SortConfig) -> SortResult<CheckOutcome> {
    let name = source.unwrap_or(STDIN_NAME);
    let reader = open_input(source)?;
    check_sorted(reader, config).with_file_context(name)
}

/// Check lines already in memory, with the same rules as [`check_sorted`]
pub fn is_sorted_lines(lines: &[&[u8]], config: &SortConfig) -> CheckOutcome {
    for (idx, pair) in lines.windows(2).enumerate() {
        let prev = Key::extract(pair[0], config);
        let curr = Key::extract(pair[1], config);
        if is_out_of_order(&prev, &curr, config) {
            return CheckOutcome::Disorder {
                line: idx + 2,
                text: String::from_utf8_lossy(pair[1]).into_owned(),
            };
        }
    }
    CheckOutcome::Sorted
}
