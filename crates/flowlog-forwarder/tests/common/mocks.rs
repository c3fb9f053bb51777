// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory implementations of the object store and the log service

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use flowlog_forwarder::destination::{LogDestination, LogStreamDescription};
use flowlog_forwarder::error::ForwarderError;
use flowlog_forwarder::materializer::LogEntry;
use flowlog_forwarder::source::ObjectSource;

/// Object source serving fixed bodies. Unknown keys fail like a missing object.
#[derive(Default)]
pub struct MockObjectSource {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MockObjectSource {
    pub fn with_object(self, bucket: &str, key: &str, body: Vec<u8>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        self
    }
}

#[async_trait]
impl ObjectSource for MockObjectSource {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ForwarderError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ForwarderError::ObjectRead {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "NoSuchKey".to_string(),
            })
    }
}

/// A recorded append request.
#[derive(Debug, Clone)]
pub struct PutCall {
    pub group: String,
    pub stream: String,
    pub entries: Vec<LogEntry>,
    pub sequence_token: Option<String>,
}

#[derive(Debug, Default)]
struct StreamState {
    token: Option<String>,
    events: Vec<LogEntry>,
}

/// Log service keeping streams in memory and enforcing sequence tokens the way the real
/// service does: every append must carry the stream's current token, if it has one, and each
/// successful append issues a new token.
#[derive(Default)]
pub struct MockLogDestination {
    streams: Mutex<Vec<(String, StreamState)>>,
    next_token: Mutex<u64>,
    puts: Mutex<Vec<PutCall>>,
    creates: Mutex<Vec<String>>,
    yield_on_describe: bool,
    fail_puts: bool,
}

impl MockLogDestination {
    pub fn with_stream(self, name: &str, token: Option<&str>) -> Self {
        self.streams.lock().unwrap().push((
            name.to_string(),
            StreamState {
                token: token.map(str::to_string),
                events: Vec::new(),
            },
        ));
        self
    }

    /// Yield to the scheduler inside describe calls so concurrent items interleave.
    pub fn yielding_on_describe(mut self) -> Self {
        self.yield_on_describe = true;
        self
    }

    /// Reject every append as if the service were unavailable.
    pub fn failing_puts(mut self) -> Self {
        self.fail_puts = true;
        self
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<String> {
        self.creates.lock().unwrap().clone()
    }

    pub fn events(&self, stream: &str) -> Vec<LogEntry> {
        self.streams
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == stream)
            .map(|(_, state)| state.events.clone())
            .unwrap_or_default()
    }

    fn issue_token(&self) -> String {
        let mut next = self.next_token.lock().unwrap();
        *next += 1;
        format!("token-{next}")
    }
}

#[async_trait]
impl LogDestination for MockLogDestination {
    async fn describe_log_streams(
        &self,
        _group: &str,
        prefix: &str,
        limit: i32,
    ) -> Result<Vec<LogStreamDescription>, ForwarderError> {
        let described = self
            .streams
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(name, _)| name.starts_with(prefix))
            .take(usize::try_from(limit).unwrap())
            .map(|(name, state)| LogStreamDescription {
                name: name.clone(),
                upload_sequence_token: state.token.clone(),
            })
            .collect();
        if self.yield_on_describe {
            tokio::task::yield_now().await;
        }
        Ok(described)
    }

    async fn create_log_stream(&self, _group: &str, stream: &str) -> Result<(), ForwarderError> {
        self.creates.lock().unwrap().push(stream.to_string());
        let mut streams = self.streams.lock().unwrap();
        if streams.iter().any(|(name, _)| name == stream) {
            return Err(ForwarderError::Destination {
                operation: "CreateLogStream",
                message: "ResourceAlreadyExistsException".to_string(),
            });
        }
        streams.push((stream.to_string(), StreamState::default()));
        Ok(())
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        entries: Vec<LogEntry>,
        sequence_token: Option<String>,
    ) -> Result<(), ForwarderError> {
        self.puts.lock().unwrap().push(PutCall {
            group: group.to_string(),
            stream: stream.to_string(),
            entries: entries.clone(),
            sequence_token: sequence_token.clone(),
        });
        if self.fail_puts {
            return Err(ForwarderError::Destination {
                operation: "PutLogEvents",
                message: "ServiceUnavailableException".to_string(),
            });
        }

        let mut streams = self.streams.lock().unwrap();
        let Some((_, state)) = streams.iter_mut().find(|(name, _)| name == stream) else {
            return Err(ForwarderError::Destination {
                operation: "PutLogEvents",
                message: "ResourceNotFoundException".to_string(),
            });
        };
        if state.token != sequence_token {
            return Err(ForwarderError::Destination {
                operation: "PutLogEvents",
                message: format!(
                    "InvalidSequenceTokenException: expected {:?}",
                    state.token
                ),
            });
        }
        state.events.extend(entries);
        state.token = Some(self.issue_token());
        Ok(())
    }
}
