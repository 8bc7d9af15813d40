//! Output module
//!
//! Emitted data leaves the tap as [`Message`]s handed to a [`RecordSink`].
//!
//! # Overview
//!
//! - `SCHEMA` once per stream before its first record
//! - `RECORD` per record, tagged with the stream's key metadata
//! - `STATE` at checkpoints with the full bookmark document
//!
//! [`JsonLinesSink`] writes one message per line to any writer (stdout for the
//! CLI); [`MemorySink`] collects messages for tests and embedding.

mod types;
mod writer;

pub use types::Message;
pub use writer::{JsonLinesSink, MemorySink, RecordSink};

#[cfg(test)]
mod tests;
