//! Output sinks receiving assembled training records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::data::{PairExample, SingleExample};
use crate::errors::ConvertError;

/// Receives assembled records, each exactly once.
///
/// The converter produces records and hands them over; sinks own the
/// serialization format. A run uses only the method matching its mode.
pub trait ExampleSink {
    /// Accept a normal-mode record.
    fn accept_single(&mut self, example: &SingleExample) -> Result<(), ConvertError>;
    /// Accept a pairwise record.
    fn accept_pair(&mut self, example: &PairExample) -> Result<(), ConvertError>;
}

/// Sink writing one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create a sink writing to `path`.
    pub fn create(path: &Path) -> Result<Self, ConvertError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap an existing writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<(), ConvertError> {
        self.out.flush()?;
        Ok(())
    }

    fn write_value<T: Serialize>(&mut self, value: &T) -> Result<(), ConvertError> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> ExampleSink for JsonLinesSink<W> {
    fn accept_single(&mut self, example: &SingleExample) -> Result<(), ConvertError> {
        self.write_value(example)
    }

    fn accept_pair(&mut self, example: &PairExample) -> Result<(), ConvertError> {
        self.write_value(example)
    }
}
