use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use sales_validate::CommitRecord;
use serde_json::{Map, Value};

use super::{BatchReceipt, RowSink};
use crate::error::{SinkError, SinkResult};

/// Key carrying the source row index in every written object.
pub const ROW_INDEX_KEY: &str = "__row_index";
/// Key carrying the source file fingerprint, when known.
pub const FINGERPRINT_KEY: &str = "__source_fingerprint";

/// Sink writing one JSON object per committed row.
///
/// ```text
/// {"__row_index":0,"__source_fingerprint":"9f86…","amount":12.5,"date":"2024-01-01",…}
/// ```
///
/// Each batch is encoded into one buffer, written and flushed before the
/// receipt is returned. When the writer fails part-way, the rows whose lines
/// were written in full are reported through [`SinkError::Interrupted`].
pub struct JsonLinesSink<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    fingerprint: Option<String>,
    written: usize,
}

impl JsonLinesSink<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> SinkResult<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: Vec::new(),
            fingerprint: None,
            written: 0,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Rows written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> SinkResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn encode(&mut self, record: &CommitRecord) -> SinkResult<()> {
        let mut object = Map::new();
        object.insert(ROW_INDEX_KEY.to_string(), Value::from(record.row_index));
        if let Some(fingerprint) = &self.fingerprint {
            object.insert(FINGERPRINT_KEY.to_string(), Value::from(fingerprint.as_str()));
        }
        for (field, value) in &record.values {
            object.insert(field.clone(), serde_json::to_value(value)?);
        }
        serde_json::to_writer(&mut self.buffer, &object)?;
        self.buffer.push(b'\n');
        Ok(())
    }

    /// Write the encoded batch, returning the bytes written before an error.
    fn write_buffer(&mut self) -> Result<(), (usize, io::Error)> {
        let mut position = 0;
        while position < self.buffer.len() {
            match self.writer.write(&self.buffer[position..]) {
                Ok(0) => return Err((position, ErrorKind::WriteZero.into())),
                Ok(count) => position += count,
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => return Err((position, error)),
            }
        }
        Ok(())
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn accept_batch(&mut self, batch: &[CommitRecord]) -> SinkResult<BatchReceipt> {
        self.buffer.clear();
        let mut line_ends = Vec::with_capacity(batch.len());
        for record in batch {
            self.encode(record)?;
            line_ends.push(self.buffer.len());
        }

        if let Err((position, source)) = self.write_buffer() {
            // Lines that made it out whole still count, provided they flush.
            let complete = line_ends.partition_point(|&end| end <= position);
            let accepted = if self.writer.flush().is_ok() { complete } else { 0 };
            self.written += accepted;
            return Err(SinkError::Interrupted { accepted, source });
        }
        self.writer.flush()?;

        self.written += batch.len();
        Ok(BatchReceipt::accepted(batch.len()))
    }

    fn finish(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
