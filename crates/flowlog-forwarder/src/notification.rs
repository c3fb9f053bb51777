// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Parsing of object storage event notifications.

use serde_json::Value;

use crate::error::ForwarderError;

pub const NOT_AN_OBJECT: &str = "S3 Record was not an object";
pub const NO_RECORDS: &str = "There were no records";

/// The bucket and key of one object announced by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub bucket: String,
    pub key: String,
}

/// What a single notification record refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    Object(ObjectReference),
    /// No object key, as sent when an empty folder is created.
    MissingKey,
    /// The `s3` member is missing or is not an object.
    NotAnObject,
}

/// Decodes a notification payload into its raw records.
///
/// Returns a soft error message when the payload is not JSON or its `Records` member is not a
/// list.
pub fn parse_payload(payload: &str) -> Result<Vec<Value>, String> {
    let parsed: Value = serde_json::from_str(payload).map_err(|e| e.to_string())?;
    match parsed {
        Value::Object(mut event) => match event.remove("Records") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(NO_RECORDS.to_string()),
        },
        _ => Err(NO_RECORDS.to_string()),
    }
}

impl RecordTarget {
    /// Classifies one notification record.
    ///
    /// A record with a key but no bucket name is malformed beyond skipping and is reported as a
    /// fault for that record.
    pub fn from_record(record: &Value) -> Result<Self, ForwarderError> {
        let Some(s3) = record.get("s3").filter(|s3| s3.is_object()) else {
            return Ok(Self::NotAnObject);
        };
        let Some(key) = s3.pointer("/object/key").and_then(Value::as_str) else {
            return Ok(Self::MissingKey);
        };
        let bucket = s3
            .pointer("/bucket/name")
            .and_then(Value::as_str)
            .ok_or(ForwarderError::MissingBucket)?;
        Ok(Self::Object(ObjectReference {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }))
    }
}
