//! Message sinks

use super::types::Message;
use crate::error::{Error, Result};
use serde_json::Value;
use std::io::Write;

/// Receives every message emitted by a sync
pub trait RecordSink: Send {
    /// Deliver one message
    fn write(&mut self, message: &Message) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// JSON Lines
// ============================================================================

/// Writes each message as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<std::io::Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .map_err(|e| Error::output(format!("Failed to serialize message: {e}")))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Collects messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Messages in emission order
    pub messages: Vec<Message>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records emitted for a stream, in order
    pub fn records(&self, stream: &str) -> Vec<&Value> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Number of schema messages for a stream
    pub fn schema_count(&self, stream: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_schema() && m.stream() == Some(stream))
            .count()
    }

    /// State documents emitted, in order
    pub fn states(&self) -> Vec<&Value> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
