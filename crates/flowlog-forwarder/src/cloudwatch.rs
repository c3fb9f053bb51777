// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! [`LogDestination`] backed by CloudWatch Logs.

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use aws_sdk_cloudwatchlogs::Client;
use tracing::debug;

use crate::destination::{LogDestination, LogStreamDescription};
use crate::error::ForwarderError;
use crate::materializer::LogEntry;

#[derive(Clone, Debug)]
pub struct CloudWatchDestination {
    client: Client,
}

impl CloudWatchDestination {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogDestination for CloudWatchDestination {
    #[allow(deprecated)]
    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
        limit: i32,
    ) -> Result<Vec<LogStreamDescription>, ForwarderError> {
        let output = self
            .client
            .describe_log_streams()
            .log_group_name(group)
            .log_stream_name_prefix(prefix)
            .limit(limit)
            .send()
            .await
            .map_err(|e| {
                ForwarderError::destination("DescribeLogStreams", DisplayErrorContext(e).to_string())
            })?;

        let streams = output
            .log_streams()
            .iter()
            .filter_map(|stream| {
                Some(LogStreamDescription {
                    name: stream.log_stream_name()?.to_string(),
                    upload_sequence_token: stream.upload_sequence_token().map(str::to_string),
                })
            })
            .collect::<Vec<_>>();
        debug!("Described {} log streams in {group}", streams.len());
        Ok(streams)
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), ForwarderError> {
        self.client
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
            .map_err(|e| {
                ForwarderError::destination("CreateLogStream", DisplayErrorContext(e).to_string())
            })?;
        Ok(())
    }

    #[allow(deprecated)]
    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        entries: Vec<LogEntry>,
        sequence_token: Option<String>,
    ) -> Result<(), ForwarderError> {
        let events = entries
            .into_iter()
            .map(|entry| {
                InputLogEvent::builder()
                    .timestamp(entry.timestamp)
                    .message(entry.message)
                    .build()
                    .map_err(|e| ForwarderError::destination("PutLogEvents", e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .put_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .set_log_events(Some(events))
            .set_sequence_token(sequence_token)
            .send()
            .await
            .map_err(|e| {
                ForwarderError::destination("PutLogEvents", DisplayErrorContext(e).to_string())
            })?;

        if let Some(rejected) = output.rejected_log_events_info() {
            debug!("Some log events were rejected: {rejected:?}");
        }
        Ok(())
    }
}
