// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use flowlog_forwarder::config::Config;
use flowlog_forwarder::forwarder::Forwarder;
use serde_json::{json, Value};

use super::mocks::{MockLogDestination, MockObjectSource};

pub const BUCKET: &str = "flow-logs";
pub const LOG_GROUP: &str = "vpc-flow-logs";
pub const LOG_STREAM: &str = "2025/01/01/[$LATEST]0123456789abcdef";
pub const THREE_FIELDS: &str = "${account-id} ${action} ${bytes}";

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

pub fn object_record(bucket: &str, key: &str) -> Value {
    json!({
        "eventSource": "aws:s3",
        "eventName": "ObjectCreated:Put",
        "s3": {
            "bucket": {"name": bucket},
            "object": {"key": key, "size": 1024},
        },
    })
}

/// A notification payload referencing `keys` in [`BUCKET`].
pub fn notification(keys: &[&str]) -> String {
    let records: Vec<Value> = keys.iter().map(|key| object_record(BUCKET, key)).collect();
    json!({ "Records": records }).to_string()
}

pub fn config(template: &str) -> Arc<Config> {
    Arc::new(Config::new(LOG_GROUP, LOG_STREAM, template))
}

pub fn forwarder(
    template: &str,
    source: &Arc<MockObjectSource>,
    destination: &Arc<MockLogDestination>,
) -> Forwarder {
    Forwarder::new(config(template), source.clone(), destination.clone())
}
