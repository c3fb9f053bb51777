// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Turns one compressed flow-log object into timestamped log entries.
//!
//! ```text
//!   raw object bytes
//!         │
//!         v
//!   ┌──────────────┐
//!   │ empty check  │  (first raw line blank => nothing to do)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │   gunzip     │  (whole buffer, failure is a fault)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │ header check │  (must equal the configured format, else rejected)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │ decode lines │  (source order, empty lines skipped)
//!   └──────────────┘
//! ```

use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::read::MultiGzDecoder;
use serde::Serialize;

use crate::error::ForwarderError;
use crate::format::FormatSpec;
use crate::record::decode_line;

pub const FORMAT_MISMATCH: &str = "Format in Lambda and format in the log file differ";

/// A decoded flow record ready to be appended, stamped with the time it was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch at processing time
    pub timestamp: i64,
    /// The flow record serialized as JSON
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// The object body was blank.
    EmptyObject,
    /// The file header does not match the configured format; no line of the object is used.
    FormatMismatch { expected: String, found: String },
    Entries(Vec<LogEntry>),
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Whether the first line of the raw, still compressed, body is blank.
pub fn is_empty_body(body: &[u8]) -> bool {
    let first_line = body.split(|byte| *byte == b'\n').next().unwrap_or_default();
    String::from_utf8_lossy(first_line).trim().is_empty()
}

/// Decompresses a whole gzip buffer. Concatenated gzip members are read as one stream.
pub fn decompress(body: &[u8]) -> Result<String, ForwarderError> {
    let mut decoder = MultiGzDecoder::new(body);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(String::from_utf8_lossy(&decompressed).into_owned())
}

/// Decodes every data line of `text` after checking its header line against `format`.
pub fn materialize_text(text: &str, format: &FormatSpec) -> Result<Materialized, ForwarderError> {
    let mut lines = text.split('\n');
    let header = lines.next().unwrap_or_default();
    let expected = format.header_line();
    if header != expected {
        return Ok(Materialized::FormatMismatch {
            expected,
            found: header.to_string(),
        });
    }

    let entries = lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let message = serde_json::to_string(&decode_line(line, format))?;
            Ok(LogEntry {
                timestamp: now_millis(),
                message,
            })
        })
        .collect::<Result<Vec<_>, ForwarderError>>()?;

    Ok(Materialized::Entries(entries))
}

/// Materializes a raw object body. Decompression failures are returned as faults.
pub fn materialize(body: &[u8], format: &FormatSpec) -> Result<Materialized, ForwarderError> {
    if is_empty_body(body) {
        return Ok(Materialized::EmptyObject);
    }
    let text = decompress(body)?;
    materialize_text(&text, format)
}
