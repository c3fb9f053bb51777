// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Faults that can occur while forwarding flow logs.
///
/// Everything except `InvalidConfig` is scoped to a single object reference or notification
/// payload and is absorbed at the nearest fan-out boundary.
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read object s3://{bucket}/{key}: {message}")]
    ObjectRead {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to decompress object: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("Failed to encode flow record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("S3 Record has no bucket name")]
    MissingBucket,

    #[error("Log service {operation} call failed: {message}")]
    Destination {
        operation: &'static str,
        message: String,
    },

    #[error("Task failed: {0}")]
    Task(String),
}

impl ForwarderError {
    pub(crate) fn destination(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Destination {
            operation,
            message: message.into(),
        }
    }
}
