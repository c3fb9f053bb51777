// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Object storage reads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::ObjectStore;
use tracing::debug;

use crate::error::ForwarderError;

#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Reads the whole object stored under `key` in `bucket`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ForwarderError>;
}

/// [`ObjectSource`] reading from S3 with credentials and region taken from the environment.
///
/// One store is built per bucket on first use and kept for the life of the process.
#[derive(Default)]
pub struct S3ObjectSource {
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl S3ObjectSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn store_for(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>, object_store::Error> {
        let mut stores = self
            .stores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        debug!("Creating object store for bucket {bucket}");
        let store: Arc<dyn ObjectStore> = Arc::new(
            AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()?,
        );
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

/// Store path naming exactly `key`.
///
/// Keys the store cannot address unchanged, such as ones with empty segments or a leading or
/// trailing `/`, are rejected rather than read under a normalized name.
fn object_path(key: &str) -> Result<Path, String> {
    let path = Path::parse(key).map_err(|e| e.to_string())?;
    if path.as_ref() != key {
        return Err(format!("key can only be read as {path}"));
    }
    Ok(path)
}

#[async_trait]
impl ObjectSource for S3ObjectSource {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ForwarderError> {
        let read_error = |e: object_store::Error| ForwarderError::ObjectRead {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        };

        let path = object_path(key).map_err(|message| ForwarderError::ObjectRead {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        })?;
        let store = self.store_for(bucket).map_err(read_error)?;
        let object = store.get(&path).await.map_err(read_error)?;
        let bytes = object.bytes().await.map_err(read_error)?;
        Ok(bytes.to_vec())
    }
}
