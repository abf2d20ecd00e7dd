//! Mapping rule CRUD service
//!
//! Rule definitions are managed here; membership and position are owned by
//! the [`MappingOrderReconciler`](crate::MappingOrderReconciler). New rules
//! are therefore always created disabled, and updates keep whatever enabled
//! flag the remote currently has.

use std::sync::Arc;

use rulesync_domain::{MappingId, MappingRule, Result, RuleSyncError};
use tracing::{debug, info, instrument};

use crate::mapping_order::MappingRepository;

/// Mapping rule service
pub struct MappingRuleService {
    repository: Arc<dyn MappingRepository>,
}

impl MappingRuleService {
    pub fn new(repository: Arc<dyn MappingRepository>) -> Self {
        Self { repository }
    }

    /// Create a rule, disabled and without a position.
    ///
    /// # Errors
    /// Returns [`RuleSyncError::Internal`] if the remote did not echo an id.
    #[instrument(skip_all, fields(name = %rule.name))]
    pub async fn create(&self, rule: &MappingRule) -> Result<MappingId> {
        let body = MappingRule { id: None, enabled: false, position: None, ..rule.clone() };
        let id = self.repository.create(&body).await?;
        if id == 0 {
            return Err(RuleSyncError::Internal(format!(
                "creating mapping '{}' returned no id",
                rule.name
            )));
        }
        info!(id, "mapping created");
        Ok(id)
    }

    /// Fetch a rule, `None` if it does not exist
    pub async fn get(&self, id: MappingId) -> Result<Option<MappingRule>> {
        match self.repository.get(id).await {
            Ok(rule) => Ok(Some(rule)),
            Err(err) if err.is_not_found() => {
                debug!(id, "mapping not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Replace a rule's definition, keeping its current enabled flag.
    ///
    /// # Errors
    /// [`RuleSyncError::NotFound`] if the rule does not exist, or
    /// [`RuleSyncError::Internal`] if the remote echoes another id.
    #[instrument(skip(self, rule))]
    pub async fn update(&self, id: MappingId, rule: &MappingRule) -> Result<MappingId> {
        let current = self.repository.get(id).await?;
        if current.id != Some(id) {
            return Err(RuleSyncError::Internal(format!(
                "fetching mapping {id} returned id {:?}",
                current.id
            )));
        }

        let body = MappingRule { id: None, enabled: current.enabled, position: None, ..rule.clone() };
        let echoed = self.repository.update(id, &body).await?;
        if echoed != id {
            return Err(RuleSyncError::Internal(format!(
                "updating mapping {id} echoed id {echoed}"
            )));
        }
        info!(id, enabled = current.enabled, "mapping updated");
        Ok(id)
    }

    /// Delete a rule. Returns `false` if it was already gone.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MappingId) -> Result<bool> {
        match self.repository.delete(id).await {
            Ok(()) => {
                info!(id, "mapping deleted");
                Ok(true)
            }
            Err(err) if err.is_not_found() => {
                debug!(id, "mapping already deleted");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
