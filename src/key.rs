//! Key extraction: column slicing, blank trimming and numeric/month parsing.
//!
//! A [`Key`] is a pure function of the line and the configuration; it
//! borrows its raw bytes from the line and never looks at other lines.

use crate::config::{NumericMode, SortConfig};

/// Month abbreviations, index + 1 is the month number
const MONTHS: [&[u8; 3]; 12] = [
    b"jan", b"feb", b"mar", b"apr", b"may", b"jun", b"jul", b"aug", b"sep", b"oct", b"nov",
    b"dec",
];

/// Comparison key derived from one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key<'a> {
    /// Column slice (or whole line), after optional blank trimming
    pub raw: &'a [u8],
    /// Parsed value when a numeric mode is active and parsing succeeded
    pub numeric: Option<f64>,
    /// Month number 1-12 when month mode is active and the key names a month
    pub month: Option<u8>,
}

impl<'a> Key<'a> {
    /// Derive the key for `line` under `config`
    pub fn extract(line: &'a [u8], config: &SortConfig) -> Self {
        let mut raw = if config.key_column == 0 {
            line
        } else {
            extract_column_value(line, config.delimiter.as_bytes(), config.key_column)
        };

        if config.ignore_trailing_blanks {
            raw = trim_trailing_blanks(raw);
        }

        let month = if config.month { month_index(raw) } else { None };

        let numeric = match config.numeric_mode() {
            Some(NumericMode::Human) => parse_human_numeric(raw),
            Some(NumericMode::Plain) => parse_numeric(raw),
            None => None,
        };

        Self {
            raw,
            numeric,
            month,
        }
    }
}

/// Shorthand for [`Key::extract`]
#[inline]
pub fn extract_key<'a>(line: &'a [u8], config: &SortConfig) -> Key<'a> {
    Key::extract(line, config)
}

/// Return the 1-based `column`-th field of `line` split on `delimiter`.
///
/// Missing columns yield an empty slice, as does an empty delimiter.
pub fn extract_column_value<'a>(line: &'a [u8], delimiter: &[u8], column: usize) -> &'a [u8] {
    if column == 0 {
        return line;
    }
    match delimiter.len() {
        0 => &[],
        1 => nth_field_byte(line, delimiter[0], column - 1),
        _ => nth_field_substring(line, delimiter, column - 1),
    }
}

fn nth_field_byte(line: &[u8], delimiter: u8, index: usize) -> &[u8] {
    let mut start = 0;
    let mut seen = 0;
    for pos in memchr::memchr_iter(delimiter, line) {
        if seen == index {
            return &line[start..pos];
        }
        seen += 1;
        start = pos + 1;
    }
    if seen == index {
        &line[start..]
    } else {
        &[]
    }
}

fn nth_field_substring<'a>(line: &'a [u8], delimiter: &[u8], index: usize) -> &'a [u8] {
    let mut start = 0;
    let mut seen = 0;
    // find_iter yields non-overlapping matches, the same fields a byte split would give.
    for pos in memchr::memmem::find_iter(line, delimiter) {
        if seen == index {
            return &line[start..pos];
        }
        seen += 1;
        start = pos + delimiter.len();
    }
    if seen == index {
        &line[start..]
    } else {
        &[]
    }
}

/// Strip trailing spaces and tabs
pub fn trim_trailing_blanks(s: &[u8]) -> &[u8] {
    let end = s
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |pos| pos + 1);
    &s[..end]
}

/// Look up the month named by the first three characters of the trimmed key
pub fn month_index(s: &[u8]) -> Option<u8> {
    let start = s
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(s.len());
    let prefix = s[start..].get(..3)?;
    let lowered = [
        prefix[0].to_ascii_lowercase(),
        prefix[1].to_ascii_lowercase(),
        prefix[2].to_ascii_lowercase(),
    ];
    MONTHS
        .iter()
        .position(|m| **m == lowered)
        .map(|idx| idx as u8 + 1)
}

/// Parse a plain decimal floating-point key.
///
/// Infinite and NaN results are rejected so numeric keys stay totally ordered.
pub fn parse_numeric(s: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(s).ok()?.trim();
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a human-readable size such as `10K` or `1.5g`.
///
/// One trailing unit from B/K/M/G/T (any case) scales the number by a power
/// of 1024; without a unit the whole string is a plain number. The unit must
/// follow the digits directly.
pub fn parse_human_numeric(s: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(s).ok()?.trim();
    let (number, multiplier) = match text.as_bytes().last().map(u8::to_ascii_uppercase) {
        Some(b'B') => (&text[..text.len() - 1], 1.0),
        Some(b'K') => (&text[..text.len() - 1], 1024.0),
        Some(b'M') => (&text[..text.len() - 1], 1024.0_f64.powi(2)),
        Some(b'G') => (&text[..text.len() - 1], 1024.0_f64.powi(3)),
        Some(b'T') => (&text[..text.len() - 1], 1024.0_f64.powi(4)),
        _ => (text, 1.0),
    };
    let value = number.parse::<f64>().ok()? * multiplier;
    value.is_finite().then_some(value)
}
