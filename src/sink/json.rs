use crate::error::SinkError;
use crate::models::NormalizedRecord;
use crate::sink::RecordSink;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Batch-mode sink: records are buffered and written as one JSON array on close.
///
/// Nothing reaches disk unless `close` runs.
pub struct JsonSink {
    path: PathBuf,
    records: Vec<NormalizedRecord>,
}

impl JsonSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: Vec::new(),
        }
    }
}

impl RecordSink for JsonSink {
    fn write(&mut self, record: &NormalizedRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), SinkError> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, &self.records)?;
        out.flush()?;

        info!("💾 Saved {} records to {}", self.records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::tests::record;

    #[test]
    fn close_writes_a_single_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut sink = Box::new(JsonSink::new(&path));
        sink.write(&record("1")).unwrap();
        sink.write(&record("2")).unwrap();
        sink.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let records: Vec<NormalizedRecord> = serde_json::from_str(&text).unwrap();
        let ids: Vec<_> = records.into_iter().filter_map(|r| r.offer_id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn nothing_is_written_without_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut sink = Box::new(JsonSink::new(&path));
        sink.write(&record("1")).unwrap();
        drop(sink);

        assert!(!path.exists());
    }

    #[test]
    fn empty_run_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        Box::new(JsonSink::new(&path)).close().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
