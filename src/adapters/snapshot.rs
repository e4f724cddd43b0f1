use crate::domain::ports::{EnvelopeSource, Query, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Serves envelopes previously saved under [`Query::snapshot_name`].
///
/// A missing snapshot is "no data", the same as a non-success response from
/// the live API. A file that is present but not JSON is an error.
pub struct SnapshotSource<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotSource<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> EnvelopeSource for SnapshotSource<S> {
    async fn fetch(&self, query: &Query) -> Result<Option<Value>> {
        let name = query.snapshot_name();
        if !self.storage.exists(&name).await {
            tracing::debug!("No snapshot {} for {}", name, query);
            return Ok(None);
        }

        let bytes = self.storage.read_file(&name).await?;
        let envelope: Value = serde_json::from_slice(&bytes)?;
        Ok(Some(envelope))
    }
}
