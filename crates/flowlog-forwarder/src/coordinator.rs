// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Entry point for one invocation carrying a batch of queue messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::fanout::fan_out;
use crate::forwarder::{Forwarder, NotificationOutcome};

/// What an invocation reports to its caller, whatever happened to the items it carried.
pub const INVOCATION_RESULT: &str = "success";

/// The batch of queue messages an invocation receives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<InboundRecord>,
}

/// One queue message. Only its body is used; anything but a non-blank string is skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundRecord {
    #[serde(default)]
    pub body: Value,
}

impl InboundRecord {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Value::String(body.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// The message body was missing, not a string, or blank.
    Skipped,
    Dispatched(NotificationOutcome),
    Error { error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationReport {
    pub records: Vec<RecordOutcome>,
}

impl InvocationReport {
    /// Number of queue messages whose notification, or any object in it, ended in an error.
    pub fn error_count(&self) -> usize {
        self.records
            .iter()
            .filter(|outcome| match outcome {
                RecordOutcome::Skipped => false,
                RecordOutcome::Error { .. } => true,
                RecordOutcome::Dispatched(NotificationOutcome::Error { .. }) => true,
                RecordOutcome::Dispatched(NotificationOutcome::Processed { objects }) => {
                    objects.iter().any(|object| object.is_error())
                }
            })
            .count()
    }
}

fn usable_body(body: &Value) -> Option<&str> {
    body.as_str().filter(|body| !body.trim().is_empty())
}

/// Dispatches every usable message of `batch` concurrently and collects all outcomes.
///
/// Item failures are logged and reported in the returned [`InvocationReport`]; they never fail
/// the invocation itself.
pub async fn handle_batch(forwarder: &Forwarder, batch: InboundBatch) -> InvocationReport {
    debug!("Received {} queue messages", batch.records.len());
    let records = fan_out(batch.records, |record| {
        let forwarder = forwarder.clone();
        async move {
            let Some(body) = usable_body(&record.body) else {
                info!("Unrecognized body: {}", record.body);
                info!("Skipping");
                return Ok(RecordOutcome::Skipped);
            };
            Ok(RecordOutcome::Dispatched(forwarder.dispatch(body).await))
        }
    })
    .await
    .into_iter()
    .map(|result| {
        result.unwrap_or_else(|e| {
            error!("Failed to dispatch notification: {e}");
            RecordOutcome::Error {
                error: e.to_string(),
            }
        })
    })
    .collect();

    let report = InvocationReport { records };
    match serde_json::to_string(&report.records) {
        Ok(results) => info!("{results}"),
        Err(e) => error!("Failed to serialize invocation results: {e}"),
    }
    if report.error_count() > 0 {
        error!(
            "{} of {} queue messages had errors",
            report.error_count(),
            report.records.len()
        );
    }
    report
}
