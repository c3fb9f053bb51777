// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Decoding of a single flow-log data line into a keyed record.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::format::FormatSpec;

fn hyphen_regex() -> &'static Regex {
    static HYPHEN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)]
    HYPHEN.get_or_init(|| Regex::new(r"-([a-z])").unwrap())
}

/// Converts a hyphen-case field name to camelCase in a single pass.
///
/// Only a hyphen followed by a lowercase ASCII letter is collapsed, so `pkt-srcaddr` becomes
/// `pktSrcaddr` while `a--b` becomes `a-B`.
pub fn to_camel_case(field: &str) -> Cow<'_, str> {
    hyphen_regex().replace_all(field, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
}

/// One decoded flow-log line.
///
/// Keys keep the order of the format they were decoded with. A value is `None` when the line
/// had fewer columns than the format has fields; such keys are left out when the record is
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowRecord {
    entries: Vec<(String, Option<String>)>,
}

impl FlowRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // A repeated key keeps its first position and takes the latest value.
    fn insert(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for FlowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.entries.iter().filter(|(_, v)| v.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (key, value) in &self.entries {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Pairs the camelCased fields of `format` with the columns of `line` by position.
///
/// The line is split on every single space, so consecutive spaces produce empty columns. A line
/// with fewer columns than fields is accepted and the trailing keys are left without a value;
/// extra columns are ignored.
pub fn decode_line(line: &str, format: &FormatSpec) -> FlowRecord {
    let columns: Vec<&str> = line.split(' ').collect();
    let mut record = FlowRecord {
        entries: Vec::with_capacity(format.len()),
    };
    for (i, field) in format.fields().iter().enumerate() {
        let value = columns.get(i).map(|column| (*column).to_string());
        record.insert(to_camel_case(field).into_owned(), value);
    }
    record
}
