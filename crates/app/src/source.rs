//! Loads the records of one processing run from the configured source.
use std::path::PathBuf;

use api_types::snapshot::Snapshot;

use crate::{
    api::{ApiClient, ApiError},
    settings::Source,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SourceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub(crate) async fn load(source: &Source) -> Result<Snapshot, SourceError> {
    let snapshot = match source {
        Source::Http(http) => ApiClient::new(http)?.snapshot().await?,
        Source::File(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Read {
                    path: path.clone(),
                    source,
                })?;
            serde_json::from_str(&raw).map_err(|source| SourceError::Snapshot {
                path: path.clone(),
                source,
            })?
        }
    };

    tracing::info!(
        "loaded {} budgets, {} items, {} draw requests",
        snapshot.budgets.len(),
        snapshot.items.len(),
        snapshot.draw_requests.len()
    );
    Ok(snapshot)
}
