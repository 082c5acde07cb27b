pub mod csv;
pub mod json;

pub use self::csv::CsvSink;
pub use self::json::JsonSink;

use crate::error::SinkError;
use crate::models::NormalizedRecord;
use clap::ValueEnum;
use std::path::Path;

/// Destination for normalized records, owned by the harvest loop for the whole run
pub trait RecordSink: Send {
    /// Accept one record
    fn write(&mut self, record: &NormalizedRecord) -> Result<(), SinkError>;

    /// Finish the run, making everything written so far durable
    fn close(self: Box<Self>) -> Result<(), SinkError>;
}

/// On-disk container for the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Semicolon-delimited rows appended as they arrive
    Csv,
    /// One JSON array written on clean shutdown
    Json,
}

impl OutputFormat {
    /// `.json` files get batch mode, everything else is appended as CSV
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Open the sink for `path`, creating its parent directory when needed
pub fn open(path: &Path, format: OutputFormat) -> Result<Box<dyn RecordSink>, SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Ok(match format {
        OutputFormat::Csv => Box::new(CsvSink::open(path)?),
        OutputFormat::Json => Box::new(JsonSink::new(path)),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::normalize::normalize_entity;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    pub fn record(offer_id: &str) -> NormalizedRecord {
        normalize_entity(
            &json!({"offerId": offer_id, "roomsTotal": 1, "area": {"value": 30}}),
            chrono::Utc::now(),
        )
    }

    /// In-memory sink whose contents stay observable after the loop consumes it
    #[derive(Clone, Default)]
    pub struct MemorySink {
        pub records: Arc<Mutex<Vec<NormalizedRecord>>>,
        pub closed: Arc<Mutex<bool>>,
    }

    impl MemorySink {
        pub fn offer_ids(&self) -> Vec<String> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter_map(|r| r.offer_id.clone())
                .collect()
        }
    }

    impl RecordSink for MemorySink {
        fn write(&mut self, record: &NormalizedRecord) -> Result<(), SinkError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<(), SinkError> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::infer(Path::new("out/data.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::infer(Path::new("out/data.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::infer(Path::new("out/data.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::infer(Path::new("data")), OutputFormat::Csv);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");

        let mut sink = open(&path, OutputFormat::Csv).unwrap();
        sink.write(&record("1")).unwrap();
        sink.close().unwrap();

        assert!(path.exists());
    }
}
