// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::future::Future;

use futures::future::join_all;

use crate::error::ForwarderError;

/// Runs `task` for every item concurrently and collects every result in input order.
///
/// All tasks are spawned before any is awaited. A task that panics or is cancelled yields
/// `ForwarderError::Task` in its slot; it never affects the other results.
pub async fn fan_out<I, F, Fut, T>(items: I, task: F) -> Vec<Result<T, ForwarderError>>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<T, ForwarderError>> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = items
        .into_iter()
        .map(|item| tokio::spawn(task(item)))
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap_or_else(|e| Err(ForwarderError::Task(e.to_string()))))
        .collect()
}
