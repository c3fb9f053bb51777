// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::ForwarderError;
use crate::materializer::LogEntry;

/// An existing stream as reported by the log service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogStreamDescription {
    pub name: String,
    pub upload_sequence_token: Option<String>,
}

/// The append-only, sequence-ordered log service entries are forwarded to.
#[async_trait]
pub trait LogDestination: Send + Sync {
    /// Lists at most `limit` streams of `group` whose name starts with `prefix`, most recent
    /// first.
    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
        limit: i32,
    ) -> Result<Vec<LogStreamDescription>, ForwarderError>;

    /// Creates `stream` in `group`. Creating a stream that already exists is a fault.
    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), ForwarderError>;

    /// Appends `entries` to `stream`. The request carries a sequence token only when
    /// `sequence_token` is `Some`. The token for the following append is looked up again, so
    /// none is returned here.
    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        entries: Vec<LogEntry>,
        sequence_token: Option<String>,
    ) -> Result<(), ForwarderError>;
}
