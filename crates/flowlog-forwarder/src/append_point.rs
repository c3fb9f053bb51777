// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Decides where the next append to the destination stream goes.

use tracing::{debug, info};

use crate::config::Config;
use crate::destination::LogDestination;
use crate::error::ForwarderError;

/// Where the next append to the destination stream lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendPoint {
    /// The stream already existed. The token is what the service reported for it; a stream
    /// that never received events has none.
    Existing(Option<String>),
    /// The stream was just created and its first append needs no token.
    Created,
}

impl AppendPoint {
    /// The token to attach to the next append, or `None` when the token must be omitted.
    ///
    /// An empty token is treated as absent.
    pub fn into_sequence_token(self) -> Option<String> {
        match self {
            Self::Existing(token) => token.filter(|token| !token.is_empty()),
            Self::Created => None,
        }
    }
}

/// Looks the destination stream up among the `config.describe_limit` most recent streams and
/// creates it when it is not found there.
///
/// A stream that exists but is older than the lookup window is treated as missing, so the
/// create call fails and the fault is left to the caller.
pub async fn resolve_append_point(
    destination: &dyn LogDestination,
    config: &Config,
) -> Result<AppendPoint, ForwarderError> {
    debug!("Getting existing log stream details");
    let streams = destination
        .describe_log_streams(&config.log_group, &config.log_stream, config.describe_limit)
        .await?;

    debug!("Checking for matching existing log stream");
    match streams.into_iter().find(|s| s.name == config.log_stream) {
        Some(stream) => {
            debug!("Matching stream found");
            Ok(AppendPoint::Existing(stream.upload_sequence_token))
        }
        None => {
            info!(
                "No matching stream found, creating new stream {}",
                config.log_stream
            );
            destination
                .create_log_stream(&config.log_group, &config.log_stream)
                .await?;
            Ok(AppendPoint::Created)
        }
    }
}
