use crate::error::SinkError;
use crate::models::NormalizedRecord;
use crate::sink::RecordSink;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

/// Append-mode sink: one quoted, `;`-delimited row per record, flushed immediately
pub struct CsvSink {
    writer: Writer<File>,
}

impl CsvSink {
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let fresh = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .quote_style(QuoteStyle::Always)
            .from_writer(file);

        if fresh {
            writer.write_record(NormalizedRecord::COLUMNS)?;
            writer.flush()?;
        }

        debug!(path = %path.display(), fresh, "Opened CSV output");
        Ok(Self { writer })
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, record: &NormalizedRecord) -> Result<(), SinkError> {
        self.writer.write_record(record.to_row())?;
        self.writer.flush()?;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
