use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rulesync_core::ObservedStateStore;
use rulesync_domain::{ObservedOrderState, Result, RuleSyncError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::errors::InfraError;

/// Observed order state persisted as pretty-printed JSON
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// readers never see a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(err: std::io::Error) -> RuleSyncError {
    InfraError::from(err).into()
}

#[async_trait]
impl ObservedStateStore for JsonFileStateStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<ObservedOrderState>> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("state file does not exist yet");
                return Ok(None);
            }
            Err(err) => return Err(io_error(err)),
        };

        let state: ObservedOrderState =
            serde_json::from_slice(&data).map_err(|err| RuleSyncError::from(InfraError::from(err)))?;
        Ok(Some(state))
    }

    #[instrument(skip(self, state), fields(path = %self.path.display()))]
    async fn save(&self, state: &ObservedOrderState) -> Result<()> {
        let data = serde_json::to_vec_pretty(state)
            .map_err(|err| RuleSyncError::from(InfraError::from(err)))?;

        let temp_path = self.path.with_extension("tmp");
        if let Some(parent) = temp_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .await
            .map_err(io_error)?;
        file.write_all(&data).await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(io_error)?;

        info!(
            enabled = state.enabled.len(),
            disabled = state.disabled.len(),
            "observed state saved"
        );
        Ok(())
    }
}
