//! Line ingestion shared by the batch sorter and the streaming verifier.
//!
//! Both paths normalize records through [`normalize_record`], so they agree
//! on what a line is: the bytes up to `\n`, minus one trailing `\r`.

use crate::error::{SortContext, SortError, SortResult};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Name used for standard input in paths and diagnostics
pub const STDIN_NAME: &str = "-";

/// Strip one trailing `\n`, then one trailing `\r`
#[inline]
pub fn normalize_record(record: &[u8]) -> &[u8] {
    let record = record.strip_suffix(b"\n").unwrap_or(record);
    record.strip_suffix(b"\r").unwrap_or(record)
}

/// Whole input held in memory: a mapped file or an owned buffer
pub enum InputData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl std::ops::Deref for InputData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            InputData::Mapped(m) => m,
            InputData::Owned(v) => v,
        }
    }
}

impl InputData {
    /// Read a whole source into memory; `None` or `-` means stdin
    pub fn load(source: Option<&str>) -> SortResult<Self> {
        match source {
            None | Some(STDIN_NAME) => {
                let mut data = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut data)
                    .with_context(|| "reading standard input".to_string())?;
                Ok(InputData::Owned(data))
            }
            Some(path) => Self::map_file(Path::new(path)),
        }
    }

    /// Memory-map a file; empty files fall back to an owned buffer
    pub fn map_file(path: &Path) -> SortResult<Self> {
        let name = path.display().to_string();
        let file = open_file(path)?;
        let len = file.metadata().with_file_context(&name)?.len();
        if len == 0 {
            return Ok(InputData::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only and lives as long as the lines borrowed from it.
        let mmap = unsafe { Mmap::map(&file) }.with_file_context(&name)?;
        Ok(InputData::Mapped(mmap))
    }

    /// Copy a mapped file into memory so the file itself may be rewritten
    pub fn into_owned(self) -> Self {
        match self {
            InputData::Mapped(m) => InputData::Owned(m.to_vec()),
            owned => owned,
        }
    }

    /// Split into normalized records
    pub fn records(&self) -> Vec<&[u8]> {
        split_records(self)
    }
}

/// Split a buffer into normalized records.
///
/// A final record without a terminating newline still counts as a line.
pub fn split_records(data: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::with_capacity(data.len() / 32 + 1);
    let mut start = 0;

    for pos in memchr::memchr_iter(b'\n', data) {
        records.push(normalize_record(&data[start..=pos]));
        start = pos + 1;
    }

    if start < data.len() {
        records.push(normalize_record(&data[start..]));
    }

    records
}

/// Reads one normalized record at a time into a caller-owned buffer
pub struct RecordReader<R> {
    inner: R,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `buf` with the next record; returns `false` at end of input
    pub fn read_record(&mut self, buf: &mut Vec<u8>) -> io::Result<bool> {
        buf.clear();
        if self.inner.read_until(b'\n', buf)? == 0 {
            return Ok(false);
        }
        let len = normalize_record(buf).len();
        buf.truncate(len);
        Ok(true)
    }
}

/// Open a source for streaming; `None` or `-` means stdin
pub fn open_input(source: Option<&str>) -> SortResult<Box<dyn BufRead>> {
    match source {
        None | Some(STDIN_NAME) => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) => {
            let file = open_file(Path::new(path))?;
            Ok(Box::new(BufReader::with_capacity(256 * 1024, file)))
        }
    }
}

fn open_file(path: &Path) -> SortResult<File> {
    let name = path.display().to_string();
    if path.is_dir() {
        return Err(SortError::is_directory(&name));
    }
    File::open(path).with_file_context(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_record() {
        assert_eq!(normalize_record(b"apple\r\n"), b"apple");
        assert_eq!(normalize_record(b"apple\n"), b"apple");
        assert_eq!(normalize_record(b"apple\r"), b"apple");
        assert_eq!(normalize_record(b"apple"), b"apple");
        assert_eq!(normalize_record(b"a\r\r\n"), b"a\r");
    }

    #[test]
    fn test_split_records() {
        let records = split_records(b"b\r\na\n\nc");
        assert_eq!(records, vec![&b"b"[..], b"a", b"", b"c"]);
        assert!(split_records(b"").is_empty());
        assert_eq!(split_records(b"\n"), vec![&b""[..]]);
    }

    #[test]
    fn test_record_reader_matches_split() {
        let data = b"one\r\ntwo\n\nthree\r";
        let mut reader = RecordReader::new(&data[..]);
        let mut buf = Vec::new();
        let mut streamed = Vec::new();
        while reader.read_record(&mut buf).expect("in-memory read") {
            streamed.push(buf.clone());
        }
        let split: Vec<Vec<u8>> = split_records(data).iter().map(|r| r.to_vec()).collect();
        assert_eq!(streamed, split);
    }

    #[test]
    fn test_map_file() -> SortResult<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("input.txt");
        fs::write(&path, "zebra\r\napple\n")?;

        let data = InputData::map_file(&path)?;
        assert_eq!(data.records(), vec![&b"zebra"[..], b"apple"]);

        let empty = temp_dir.path().join("empty.txt");
        fs::write(&empty, "")?;
        assert!(InputData::map_file(&empty)?.records().is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_and_directory_inputs() -> SortResult<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("missing.txt");
        assert!(matches!(
            InputData::map_file(&missing),
            Err(SortError::FileNotFound { .. })
        ));
        assert!(matches!(
            InputData::map_file(temp_dir.path()),
            Err(SortError::IsDirectory { .. })
        ));
        Ok(())
    }
}
