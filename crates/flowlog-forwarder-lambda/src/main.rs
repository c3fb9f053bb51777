// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process;
use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use flowlog_forwarder::{
    cloudwatch::CloudWatchDestination,
    config::{Config, DEFAULT_LOG_LEVEL},
    coordinator::{handle_batch, InboundBatch, INVOCATION_RESULT},
    error::ForwarderError,
    forwarder::Forwarder,
    source::S3ObjectSource,
};

/// Filter for the subscriber. An invalid config still gets one, at the default level, so the
/// error can be reported through it.
fn env_filter(config: &Result<Config, ForwarderError>) -> String {
    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str());
    format!("h2=off,hyper=off,rustls=off,{log_level}")
}

#[tokio::main]
pub async fn main() {
    let config = Config::from_env();
    let env_filter = env_filter(&config);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match config {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Error creating flow-log forwarder config: {e}");
            process::exit(1);
        }
    };
    debug!(
        "Forwarding flow logs with format \"{}\" to {}/{}",
        config.format.header_line(),
        config.log_group,
        config.log_stream
    );

    let sdk_config = aws_config::load_from_env().await;
    let destination = Arc::new(CloudWatchDestination::new(
        aws_sdk_cloudwatchlogs::Client::new(&sdk_config),
    ));
    let source = Arc::new(S3ObjectSource::new());
    let forwarder = Forwarder::new(config, source, destination);

    let handler = service_fn(move |event: LambdaEvent<InboundBatch>| {
        let forwarder = forwarder.clone();
        async move {
            handle_batch(&forwarder, event.payload).await;
            Ok::<&str, lambda_runtime::Error>(INVOCATION_RESULT)
        }
    });

    if let Err(e) = lambda_runtime::run(handler).await {
        error!("Flow-log forwarder runtime stopped: {e}");
        process::exit(1);
    }
}
