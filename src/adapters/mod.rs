// Concrete implementations of the domain ports: where envelopes come from and
// where reports go.

pub mod http;
pub mod snapshot;
pub mod storage;

pub use http::HttpSource;
pub use snapshot::SnapshotSource;
pub use storage::LocalStorage;

use crate::config::{SourceKind, TreasurerConfig};
use crate::domain::ports::EnvelopeSource;
use crate::utils::error::{Result, TreasurerError};
use std::time::Duration;

/// Builds the envelope source named by `[source]`.
pub fn source_from_config(config: &TreasurerConfig) -> Result<Box<dyn EnvelopeSource>> {
    let source = &config.source;
    match config.source_kind()? {
        SourceKind::Snapshot => {
            let path = source
                .path
                .clone()
                .ok_or_else(|| TreasurerError::MissingConfigError {
                    field: "source.path".to_string(),
                })?;
            tracing::info!("Reading snapshots from {}", path);
            Ok(Box::new(SnapshotSource::new(LocalStorage::new(path))))
        }
        SourceKind::Http => {
            let token =
                source
                    .access_token
                    .clone()
                    .ok_or_else(|| TreasurerError::MissingConfigError {
                        field: "source.access_token".to_string(),
                    })?;
            let base_url = source
                .base_url
                .clone()
                .unwrap_or_else(|| http::DEFAULT_BASE_URL.to_string());
            tracing::info!("Querying {}", base_url);
            Ok(Box::new(HttpSource::new(
                base_url,
                token,
                Duration::from_secs(
                    source
                        .timeout_seconds
                        .unwrap_or(http::DEFAULT_TIMEOUT_SECONDS),
                ),
                Duration::from_millis(
                    source
                        .request_delay_ms
                        .unwrap_or(http::DEFAULT_REQUEST_DELAY_MS),
                ),
            )?))
        }
    }
}
