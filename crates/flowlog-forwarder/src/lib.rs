// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards VPC flow-log files announced through object storage notifications to a
//! sequence-ordered log stream, one log event per flow record.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod append_point;
pub mod cloudwatch;
pub mod config;
pub mod coordinator;
pub mod destination;
pub mod error;
pub mod fanout;
pub mod format;
pub mod forwarder;
pub mod materializer;
pub mod notification;
pub mod record;
pub mod source;
