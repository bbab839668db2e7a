//! JSON Lines writer for received fill batches.

use crate::error::PersistenceResult;
use adder_core::Fill;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Append-only fill log.
///
/// Writes one JSON array per received fill batch, one batch per line.
/// Opens lazily in append mode so an existing log is never truncated.
pub struct FillLog {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    batches_written: usize,
}

impl FillLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
            batches_written: 0,
        }
    }

    /// Append one fill batch as a single JSON line and flush to disk.
    pub fn append_batch(&mut self, fills: &[Fill]) -> PersistenceResult<()> {
        if fills.is_empty() {
            return Ok(());
        }

        if self.writer.is_none() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.writer = Some(BufWriter::new(file));
            debug!(path = %self.path.display(), "Opened fill log (append mode)");
        }

        let writer = self.writer.as_mut().expect("writer opened above");
        let line = serde_json::to_string(fills)?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        self.batches_written += 1;

        debug!(count = fills.len(), "Appended fill batch");
        Ok(())
    }

    /// Number of batches written in this session.
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }
}

impl Drop for FillLog {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "Failed to flush fill log on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adder_core::{Price, Side, Size};
    use rust_decimal_macros::dec;
    use std::io::{BufRead, BufReader};
    use tempfile::TempDir;

    fn make_fill(oid: u64) -> Fill {
        Fill {
            coin: "ARB".to_string(),
            side: Side::Bid,
            price: Price::new(dec!(999.5)),
            size: Size::new(dec!(2)),
            oid,
            time_ms: 1_700_000_000_000 + oid,
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        BufReader::new(file).lines().map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_one_line_per_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fills.jsonl");
        let mut log = FillLog::new(&path);

        log.append_batch(&[make_fill(1), make_fill(2)]).unwrap();
        log.append_batch(&[make_fill(3)]).unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        let first: Vec<Fill> = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].oid, 1);
        assert_eq!(log.batches_written(), 2);
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fills.jsonl");
        let mut log = FillLog::new(&path);

        log.append_batch(&[]).unwrap();

        // The file is only created on first real write.
        assert!(!path.exists());
        assert_eq!(log.batches_written(), 0);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fills.jsonl");

        {
            let mut log = FillLog::new(&path);
            log.append_batch(&[make_fill(1)]).unwrap();
        }
        {
            let mut log = FillLog::new(&path);
            log.append_batch(&[make_fill(2)]).unwrap();
        }

        assert_eq!(read_lines(&path).len(), 2);
    }
}
