use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rulesync_common::RetryPolicy;
use rulesync_core::MappingRepository;
use rulesync_domain::constants::{
    TOGGLE_RETRIABLE_STATUS_CODES, TOGGLE_RETRY_BASE_MS, TOGGLE_RETRY_COUNT,
    TOGGLE_RETRY_EXPONENT_BASE,
};
use rulesync_domain::{MappingId, MappingRule, Result, RuleSyncError};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{paths, ApiClient, RequestSpec};

/// Write endpoints answer with `{"id": <id>}`; a missing id reads as 0.
#[derive(Debug, Deserialize)]
struct IdEcho {
    #[serde(default)]
    id: MappingId,
}

/// Retry policy for membership toggles
pub fn default_toggle_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .retries(TOGGLE_RETRY_COUNT)
        .retry_on(TOGGLE_RETRIABLE_STATUS_CODES)
        .backoff_base(Duration::from_millis(TOGGLE_RETRY_BASE_MS))
        .backoff_exponent_base(TOGGLE_RETRY_EXPONENT_BASE)
        .build()
}

/// [`MappingRepository`] backed by the `/api/2/mappings` endpoints
pub struct ApiMappingRepository {
    client: Arc<ApiClient>,
    cancel: CancellationToken,
    toggle_policy: RetryPolicy,
}

impl ApiMappingRepository {
    /// Every call made through this repository observes `cancel`.
    pub fn new(client: Arc<ApiClient>, cancel: CancellationToken) -> Self {
        Self { client, cancel, toggle_policy: default_toggle_policy() }
    }

    pub fn with_toggle_policy(mut self, policy: RetryPolicy) -> Self {
        self.toggle_policy = policy;
        self
    }

    async fn write(&self, spec: RequestSpec) -> Result<MappingId> {
        let echo: IdEcho = self.client.execute(&spec, &self.cancel).await?;
        Ok(echo.id)
    }
}

fn encode(spec: RequestSpec, rule: &MappingRule) -> Result<RequestSpec> {
    Ok(spec.json_body(rule)?)
}

#[async_trait]
impl MappingRepository for ApiMappingRepository {
    async fn list_enabled(&self) -> Result<Vec<MappingRule>> {
        let spec = RequestSpec::get(paths::MAPPINGS);
        Ok(self.client.execute(&spec, &self.cancel).await?)
    }

    async fn list_disabled(&self) -> Result<Vec<MappingRule>> {
        let spec = RequestSpec::get(paths::MAPPINGS).query("enabled", false);
        Ok(self.client.execute(&spec, &self.cancel).await?)
    }

    async fn get(&self, id: MappingId) -> Result<MappingRule> {
        let spec = RequestSpec::get(paths::mapping(id));
        Ok(self.client.execute(&spec, &self.cancel).await?)
    }

    async fn create(&self, rule: &MappingRule) -> Result<MappingId> {
        let body = MappingRule { id: None, ..rule.clone() };
        self.write(encode(RequestSpec::post(paths::MAPPINGS), &body)?).await
    }

    async fn update(&self, id: MappingId, rule: &MappingRule) -> Result<MappingId> {
        let body = MappingRule { id: None, ..rule.clone() };
        self.write(encode(RequestSpec::put(paths::mapping(id)), &body)?).await
    }

    async fn set_membership(&self, rule: &MappingRule, enabled: bool) -> Result<MappingId> {
        let id = rule.id.ok_or_else(|| {
            RuleSyncError::InvalidInput(format!("cannot toggle unsaved mapping {}", rule.label()))
        })?;
        debug!(id, enabled, "toggling mapping membership");

        let spec = encode(RequestSpec::put(paths::mapping(id)), &rule.membership_body(enabled))?
            .retry(self.toggle_policy.clone());
        self.write(spec).await
    }

    async fn delete(&self, id: MappingId) -> Result<()> {
        let spec = RequestSpec::delete(paths::mapping(id));
        Ok(self.client.execute_empty(&spec, &self.cancel).await?)
    }

    async fn reorder(&self, enabled: &[MappingId]) -> Result<Vec<MappingId>> {
        let spec = RequestSpec::put(paths::MAPPINGS_SORT).json_body(enabled)?;
        Ok(self.client.execute(&spec, &self.cancel).await?)
    }
}
