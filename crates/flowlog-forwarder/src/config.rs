// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::error::ForwarderError;
use crate::format::{FormatSpec, DEFAULT_LOG_FORMAT};

/// Stream name used when the execution context does not provide one.
pub const UNDEFINED_STREAM: &str = "undefined-stream";

/// How many of the most recent log streams are inspected when looking for the destination
/// stream. This is also the maximum the log service accepts.
pub const DEFAULT_DESCRIBE_LIMIT: i32 = 50;

/// Log level used when `LOG_LEVEL` is unset, or when the configuration cannot be loaded.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Forwarder configuration, built once at start-up and shared read-only by every item.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination log group
    pub log_group: String,
    /// Destination log stream, shared by every invocation running in the same execution context
    pub log_stream: String,
    /// Template the format was resolved from
    pub log_format: String,
    /// Ordered field names resolved from `log_format`
    pub format: FormatSpec,
    /// Number of existing streams inspected before a stream is considered missing
    pub describe_limit: i32,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    pub fn new(log_group: &str, log_stream: &str, log_format: &str) -> Self {
        Self {
            log_group: log_group.to_string(),
            log_stream: log_stream.to_string(),
            log_format: log_format.to_string(),
            format: FormatSpec::from_template(log_format),
            describe_limit: DEFAULT_DESCRIBE_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ForwarderError> {
        let log_group = env::var("LOGGROUP")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .ok_or_else(|| {
                ForwarderError::InvalidConfig("LOGGROUP environment variable is not set".into())
            })?;
        let log_stream = env::var("AWS_LAMBDA_LOG_STREAM_NAME")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| UNDEFINED_STREAM.to_string());
        let log_format = env::var("LOG_FORMAT")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());
        let describe_limit = env::var("LOG_STREAM_DESCRIBE_LIMIT")
            .ok()
            .and_then(|limit| limit.trim().parse::<i32>().ok())
            .unwrap_or(DEFAULT_DESCRIBE_LIMIT);
        let log_level = env::var("LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            describe_limit,
            log_level,
            ..Self::new(&log_group, &log_stream, &log_format)
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ForwarderError> {
        if self.log_group.trim().is_empty() {
            return Err(ForwarderError::InvalidConfig(
                "log group cannot be empty".to_string(),
            ));
        }

        if !(1..=DEFAULT_DESCRIBE_LIMIT).contains(&self.describe_limit) {
            return Err(ForwarderError::InvalidConfig(format!(
                "Invalid log stream describe limit {}. Must be between 1 and {}",
                self.describe_limit, DEFAULT_DESCRIBE_LIMIT
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ForwarderError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "LOGGROUP",
            "AWS_LAMBDA_LOG_STREAM_NAME",
            "LOG_FORMAT",
            "LOG_STREAM_DESCRIBE_LIMIT",
            "LOG_LEVEL",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_error_if_log_group_missing() {
        clear_env();
        let config = Config::from_env();
        assert!(config.is_err());
        assert_eq!(
            config.unwrap_err().to_string(),
            "Invalid configuration: LOGGROUP environment variable is not set"
        );
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        env::set_var("LOGGROUP", "vpc-flow-logs");
        let config = Config::from_env().expect("config should load");
        assert_eq!(config.log_group, "vpc-flow-logs");
        assert_eq!(config.log_stream, UNDEFINED_STREAM);
        assert_eq!(config.log_format, DEFAULT_LOG_FORMAT);
        assert_eq!(config.format.len(), 21);
        assert_eq!(config.describe_limit, 50);
        assert_eq!(config.log_level, "info");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("LOGGROUP", "vpc-flow-logs");
        env::set_var(
            "AWS_LAMBDA_LOG_STREAM_NAME",
            "2025/01/01/[$LATEST]0123456789abcdef",
        );
        env::set_var("LOG_FORMAT", "${account-id} ${action} ${bytes}");
        env::set_var("LOG_STREAM_DESCRIBE_LIMIT", "10");
        env::set_var("LOG_LEVEL", "DEBUG");
        let config = Config::from_env().expect("config should load");
        assert_eq!(config.log_stream, "2025/01/01/[$LATEST]0123456789abcdef");
        assert_eq!(config.format.fields(), ["account-id", "action", "bytes"]);
        assert_eq!(config.describe_limit, 10);
        assert_eq!(config.log_level, "debug");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_values_fall_back() {
        clear_env();
        env::set_var("LOGGROUP", "vpc-flow-logs");
        env::set_var("AWS_LAMBDA_LOG_STREAM_NAME", "  ");
        env::set_var("LOG_FORMAT", "");
        env::set_var("LOG_STREAM_DESCRIBE_LIMIT", "lots");
        let config = Config::from_env().expect("config should load");
        assert_eq!(config.log_stream, UNDEFINED_STREAM);
        assert_eq!(config.log_format, DEFAULT_LOG_FORMAT);
        assert_eq!(config.describe_limit, DEFAULT_DESCRIBE_LIMIT);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_describe_limit_above_service_maximum() {
        clear_env();
        env::set_var("LOGGROUP", "vpc-flow-logs");
        env::set_var("LOG_STREAM_DESCRIBE_LIMIT", "500");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = Config {
            log_level: "verbose".to_string(),
            ..Config::new("group", "stream", DEFAULT_LOG_FORMAT)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_describe_limit_bounds() {
        for (limit, valid) in [(0, false), (1, true), (50, true), (51, false), (-3, false)] {
            let config = Config {
                describe_limit: limit,
                ..Config::new("group", "stream", DEFAULT_LOG_FORMAT)
            };
            assert_eq!(
                config.validate().is_ok(),
                valid,
                "describe limit {limit} validity"
            );
        }
    }

    #[test]
    fn test_new_resolves_format() {
        let config = Config::new("group", "stream", "${srcaddr} ${dstaddr}");
        assert_eq!(config.format.header_line(), "srcaddr dstaddr");
        assert!(config.validate().is_ok());
    }
}
