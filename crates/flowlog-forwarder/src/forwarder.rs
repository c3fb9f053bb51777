// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwarding of the objects announced by one notification payload.
//!
//! Every object reference in a payload goes through its own pipeline:
//!
//! ```text
//!   notification record
//!         │
//!         v
//!   ┌──────────────┐
//!   │ ObjectSource │  (read bucket/key)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │ materializer │  (gunzip, header check, decode)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │ append point │  (reuse stream token or create the stream)
//!   └──────┬───────┘
//!         v
//!   ┌──────────────┐
//!   │ PutLogEvents │
//!   └──────────────┘
//! ```
//!
//! Pipelines of the same payload run concurrently and a fault in one of them is reported in
//! its own outcome slot only.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::append_point::resolve_append_point;
use crate::config::Config;
use crate::destination::LogDestination;
use crate::error::ForwarderError;
use crate::fanout::fan_out;
use crate::materializer::{materialize, Materialized, FORMAT_MISMATCH};
use crate::notification::{parse_payload, ObjectReference, RecordTarget, NOT_AN_OBJECT};
use crate::source::ObjectSource;

/// Why an object reference was passed over without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The notification carried no object key.
    MissingKey,
    /// The object body was blank.
    EmptyObject,
}

/// Result of forwarding one object reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectOutcome {
    Appended { entries: usize },
    Skipped { reason: SkipReason },
    Error { error: String },
}

impl ObjectOutcome {
    fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Result of dispatching one notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// One outcome per record of the payload, in payload order.
    Processed { objects: Vec<ObjectOutcome> },
    Error { error: String },
}

/// Shared, read-only state of every pipeline.
#[derive(Clone)]
pub struct Forwarder {
    config: Arc<Config>,
    source: Arc<dyn ObjectSource>,
    destination: Arc<dyn LogDestination>,
}

impl Forwarder {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn ObjectSource>,
        destination: Arc<dyn LogDestination>,
    ) -> Self {
        Self {
            config,
            source,
            destination,
        }
    }

    /// Dispatches one notification payload.
    ///
    /// An undecodable payload, or one without a `Records` list, is reported as an error outcome.
    /// Otherwise every record is forwarded concurrently and its outcome collected, faults
    /// included.
    pub async fn dispatch(&self, payload: &str) -> NotificationOutcome {
        let records = match parse_payload(payload) {
            Ok(records) => records,
            Err(error) => {
                error!("There was an issue reading the notification payload: {error}");
                debug!("Notification payload: {payload}");
                return NotificationOutcome::Error { error };
            }
        };

        debug!("Forwarding {} notification records", records.len());
        let objects = fan_out(records, |record| {
            let forwarder = self.clone();
            async move { forwarder.forward_record(record).await }
        })
        .await
        .into_iter()
        .map(|result| {
            result.unwrap_or_else(|e| {
                error!("Failed to forward object: {e}");
                ObjectOutcome::error(e.to_string())
            })
        })
        .collect();

        NotificationOutcome::Processed { objects }
    }

    /// Forwards the object a single notification record points at.
    pub async fn forward_record(&self, record: Value) -> Result<ObjectOutcome, ForwarderError> {
        match RecordTarget::from_record(&record)? {
            RecordTarget::Object(object) => self.forward_object(&object).await,
            RecordTarget::MissingKey => {
                info!("No key found, skipping");
                Ok(ObjectOutcome::Skipped {
                    reason: SkipReason::MissingKey,
                })
            }
            RecordTarget::NotAnObject => {
                error!("{NOT_AN_OBJECT}");
                Ok(ObjectOutcome::error(NOT_AN_OBJECT))
            }
        }
    }

    /// Reads, decodes and appends one object.
    pub async fn forward_object(
        &self,
        object: &ObjectReference,
    ) -> Result<ObjectOutcome, ForwarderError> {
        let ObjectReference { bucket, key } = object;
        info!("Getting S3 data from bucket: {bucket}, at key: {key}");
        let body = self.source.get_object(bucket, key).await?;
        debug!("Data received");

        let entries = match materialize(&body, &self.config.format)? {
            Materialized::EmptyObject => {
                info!("S3 Data body was empty, skipping");
                return Ok(ObjectOutcome::Skipped {
                    reason: SkipReason::EmptyObject,
                });
            }
            Materialized::FormatMismatch { expected, found } => {
                error!("{FORMAT_MISMATCH}");
                info!("Format in Lambda: {expected}");
                info!("Format in log file: {found}");
                return Ok(ObjectOutcome::error(FORMAT_MISMATCH));
            }
            Materialized::Entries(entries) => entries,
        };

        if entries.is_empty() {
            info!("No flow records in s3://{bucket}/{key}, nothing to upload");
            return Ok(ObjectOutcome::Appended { entries: 0 });
        }

        let sequence_token = resolve_append_point(self.destination.as_ref(), &self.config)
            .await?
            .into_sequence_token();
        if sequence_token.is_some() {
            debug!("Attaching existing sequence token");
        } else {
            debug!("Using sequenceToken provided from creating a new log stream");
        }

        let count = entries.len();
        info!(
            "Uploading {count} logs to aggregated CloudWatch Log Group: {}, in stream: {}",
            self.config.log_group, self.config.log_stream
        );
        self.destination
            .put_log_events(
                &self.config.log_group,
                &self.config.log_stream,
                entries,
                sequence_token,
            )
            .await?;
        info!("Logs successfully uploaded");

        Ok(ObjectOutcome::Appended { entries: count })
    }
}
