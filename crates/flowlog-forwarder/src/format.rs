// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a flow-log format template into its ordered field names.
//!
//! A template such as `"${account-id} ${action} ${bytes}"` declares both the columns of every
//! data line and the header line the exporter writes at the top of each file.

use std::sync::OnceLock;

use regex::Regex;

/// The 21-field format used when no template override is configured.
pub const DEFAULT_LOG_FORMAT: &str = "${account-id} ${action} ${bytes} ${dstaddr} ${dstport} ${end} ${instance-id} ${interface-id} ${log-status} ${packets} ${pkt-dstaddr} ${pkt-srcaddr} ${protocol} ${srcaddr} ${srcport} ${start} ${subnet-id} ${tcp-flags} ${type} ${version} ${vpc-id}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)]
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([a-zA-Z-]+)\}").unwrap())
}

/// Ordered field names of a flow-log format.
///
/// Order is positional: field `i` maps to column `i` of a data line. It is never re-sorted and
/// duplicates are kept where they occur.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatSpec {
    fields: Vec<String>,
}

impl FormatSpec {
    /// Extracts every `${token}` placeholder from `template`, in first-occurrence order.
    ///
    /// Literal text between placeholders is ignored, and placeholders whose token contains
    /// anything other than ASCII letters and hyphens are not recognised.
    pub fn from_template(template: &str) -> Self {
        let fields = placeholder_regex()
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|token| token.as_str().to_string())
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The header line a data file written with this format starts with.
    pub fn header_line(&self) -> String {
        self.fields.join(" ")
    }
}
