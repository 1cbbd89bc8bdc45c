use crate::compare::{compare_keys, keys_equal};
use crate::config::SortConfig;
use crate::error::{SortContext, SortResult};
use crate::input::InputData;
use crate::key::Key;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// 1MB output buffer
const OUTPUT_BUF_SIZE: usize = 1024 * 1024;

/// Batch sorter: reads everything, sorts by precomputed keys, then writes
pub struct CoreSort {
    config: SortConfig,
}

/// One input line with its key and position, borrowed from the input buffer
#[derive(Debug, Clone, Copy)]
struct Record<'a> {
    line: &'a [u8],
    key: Key<'a>,
    original_index: usize,
}

impl CoreSort {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// Sort one input source and write the result.
    ///
    /// Nothing is written until the whole input has been read and sorted.
    pub fn sort(&self, source: Option<&str>) -> SortResult<()> {
        let mut data = InputData::load(source)?;
        if self.output_overwrites_input(source) {
            data = data.into_owned();
        }

        let records = data.records();
        debug!(records = records.len(), "input loaded");

        let sorted = self.sort_records(&records);
        self.write_output(&sorted)
    }

    /// Stable sort of borrowed lines, with optional unique filtering
    pub fn sort_records<'a>(&self, lines: &[&'a [u8]]) -> Vec<&'a [u8]> {
        let mut records: Vec<Record<'a>> = lines
            .iter()
            .enumerate()
            .map(|(original_index, &line)| Record {
                line,
                key: Key::extract(line, &self.config),
                original_index,
            })
            .collect();

        records.sort_by(|a, b| self.compare_records(a, b));

        if self.config.unique {
            let before = records.len();
            // dedup_by compares each element against the last retained one.
            records.dedup_by(|current, retained| {
                keys_equal(&current.key, &retained.key, &self.config)
            });
            debug!(removed = before - records.len(), "unique filter applied");
        }

        records.into_iter().map(|record| record.line).collect()
    }

    #[inline]
    fn compare_records(&self, a: &Record, b: &Record) -> Ordering {
        match compare_keys(&a.key, &b.key, &self.config) {
            // Use original index for stability
            Ordering::Equal => a.original_index.cmp(&b.original_index),
            other => other,
        }
    }

    fn output_overwrites_input(&self, source: Option<&str>) -> bool {
        let (Some(output), Some(input)) = (self.config.output_file.as_deref(), source) else {
            return false;
        };
        match (
            Path::new(output).canonicalize(),
            Path::new(input).canonicalize(),
        ) {
            (Ok(out), Ok(inp)) => out == inp,
            _ => false,
        }
    }

    /// Write sorted output
    fn write_output(&self, lines: &[&[u8]]) -> SortResult<()> {
        match &self.config.output_file {
            Some(path) => {
                let file = File::create(path).with_file_context(path)?;
                let mut out = BufWriter::with_capacity(OUTPUT_BUF_SIZE, file);
                write_records(&mut out, lines).with_file_context(path)
            }
            None => {
                let stdout = io::stdout();
                let mut out = BufWriter::with_capacity(OUTPUT_BUF_SIZE, stdout.lock());
                ignore_broken_pipe(write_records(&mut out, lines))
                    .with_context(|| "writing output".to_string())
            }
        }
    }
}

/// Write each line followed by a newline, then flush
pub fn write_records<W: Write>(out: &mut W, lines: &[&[u8]]) -> io::Result<()> {
    for line in lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Treat a closed downstream reader (`sort | head`) as a clean finish
fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("output closed by reader");
            Ok(())
        }
        other => other,
    }
}

/// Sort borrowed lines under `config`
pub fn sort_records<'a>(lines: &[&'a [u8]], config: &SortConfig) -> Vec<&'a [u8]> {
    CoreSort::new(config.clone()).sort_records(lines)
}

/// Sort owned lines under `config`
pub fn sort_lines(lines: &[String], config: &SortConfig) -> Vec<String> {
    let borrowed: Vec<&[u8]> = lines.iter().map(|line| line.as_bytes()).collect();
    let sorted = sort_records(&borrowed, config);
    // Output slices are whole input lines, so they are valid UTF-8.
    sorted
        .into_iter()
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sorted(lines: &[&str], config: &SortConfig) -> Vec<String> {
        let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        sort_lines(&owned, config)
    }

    #[test]
    fn test_lexicographic() {
        let config = SortConfig::default();
        assert_eq!(
            sorted(&["banana", "apple", "cherry"], &config),
            ["apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_numeric_by_column() {
        let config = SortConfig::new()
            .with_key_column(2)
            .with_delimiter(" ")
            .with_numeric(true);
        assert_eq!(
            sorted(&["item1 10", "item2 2", "item3 100"], &config),
            ["item2 2", "item1 10", "item3 100"]
        );
    }

    #[test]
    fn test_human_numeric_by_column() {
        let config = SortConfig::new()
            .with_key_column(2)
            .with_delimiter(" ")
            .with_human_numeric(true);
        assert_eq!(
            sorted(&["file1 10K", "file2 2M", "file3 500"], &config),
            ["file3 500", "file1 10K", "file2 2M"]
        );
    }

    #[test]
    fn test_month() {
        let config = SortConfig::new().with_month(true);
        assert_eq!(sorted(&["Apr", "Jan", "Dec"], &config), ["Jan", "Apr", "Dec"]);
    }

    #[test]
    fn test_reverse() {
        let config = SortConfig::new().with_reverse(true);
        assert_eq!(sorted(&["a", "b", "c"], &config), ["c", "b", "a"]);
    }

    #[test]
    fn test_unique_stable() {
        let config = SortConfig::new().with_unique(true);
        assert_eq!(sorted(&["b", "a", "a", "b", "c"], &config), ["a", "b", "c"]);
    }

    #[test]
    fn test_unique_keeps_first_of_run() {
        let config = SortConfig::new()
            .with_key_column(1)
            .with_delimiter(",")
            .with_unique(true);
        assert_eq!(
            sorted(&["b,2", "a,1", "b,1", "a,2"], &config),
            ["a,1", "b,2"]
        );

        let config = config.with_reverse(true);
        assert_eq!(
            sorted(&["b,2", "a,1", "b,1", "a,2"], &config),
            ["b,2", "a,1"]
        );
    }

    #[test]
    fn test_ignore_trailing_blanks_unique() {
        let config = SortConfig::new()
            .with_ignore_trailing_blanks(true)
            .with_unique(true);
        assert_eq!(sorted(&["a", "a   ", "b"], &config), ["a", "b"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let config = SortConfig::new().with_numeric(true);
        assert_eq!(
            sorted(&["2.0", "x", "2", "y", "1"], &config),
            ["x", "y", "1", "2.0", "2"]
        );

        let config = config.with_reverse(true);
        assert_eq!(
            sorted(&["2.0", "x", "2", "y", "1"], &config),
            ["2.0", "2", "1", "x", "y"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(sorted(&[], &SortConfig::default()).is_empty());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_reader_ends_quietly() {
        let lines: Vec<&[u8]> = vec![&b"apple"[..], b"banana"];
        let result = write_records(&mut ClosedPipe, &lines);
        assert_eq!(
            result.as_ref().map_err(|e| e.kind()),
            Err(io::ErrorKind::BrokenPipe)
        );
        assert!(ignore_broken_pipe(result).is_ok());

        let other = Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(ignore_broken_pipe(other).is_err());
    }

    #[test]
    fn test_sort_file_to_output() -> SortResult<()> {
        let temp_dir = TempDir::new()?;
        let input_file = temp_dir.path().join("input.txt");
        let output_file = temp_dir.path().join("output.txt");

        fs::write(&input_file, "zebra\r\napple\nbanana\ncherry")?;

        let config = SortConfig::new()
            .with_output_file(Some(output_file.to_string_lossy().to_string()));
        CoreSort::new(config).sort(input_file.to_str())?;

        let output_content = fs::read_to_string(&output_file)?;
        assert_eq!(output_content, "apple\nbanana\ncherry\nzebra\n");

        Ok(())
    }

    #[test]
    fn test_sort_file_in_place() -> SortResult<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("data.txt");
        fs::write(&file, "100\n20\n3\n1000\n")?;
        let path = file.to_string_lossy().to_string();

        let config = SortConfig::new()
            .with_numeric(true)
            .with_output_file(Some(path.clone()));
        CoreSort::new(config).sort(Some(path.as_str()))?;

        assert_eq!(fs::read_to_string(&file)?, "3\n20\n100\n1000\n");
        Ok(())
    }

    #[test]
    fn test_missing_input_writes_nothing() -> SortResult<()> {
        let temp_dir = TempDir::new()?;
        let output_file = temp_dir.path().join("output.txt");
        let config = SortConfig::new()
            .with_output_file(Some(output_file.to_string_lossy().to_string()));

        let missing = temp_dir.path().join("missing.txt");
        let result = CoreSort::new(config).sort(missing.to_str());
        assert!(result.is_err());
        assert!(!output_file.exists());
        Ok(())
    }
}
