//! Port interfaces for mapping rule reconciliation
//!
//! These traits define the boundaries between the reconciler and the
//! identity provider / local state persistence.

use async_trait::async_trait;
use rulesync_domain::{MappingId, MappingRule, ObservedOrderState, Result};

/// Remote collection of mapping rules
///
/// Implementations report a missing rule as
/// [`RuleSyncError::NotFound`](rulesync_domain::RuleSyncError::NotFound).
/// Concurrent writers against the same collection are not coordinated; the
/// remote is the only source of truth.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// All enabled rules, in whatever order the remote returns them
    async fn list_enabled(&self) -> Result<Vec<MappingRule>>;

    /// All disabled rules
    async fn list_disabled(&self) -> Result<Vec<MappingRule>>;

    /// Fetch a single rule
    async fn get(&self, id: MappingId) -> Result<MappingRule>;

    /// Create a rule and return the server-assigned id (0 if none was echoed)
    async fn create(&self, rule: &MappingRule) -> Result<MappingId>;

    /// Replace a rule's definition and return the echoed id
    async fn update(&self, id: MappingId, rule: &MappingRule) -> Result<MappingId>;

    /// Move a rule to the enabled or disabled partition with a null position
    /// and return the echoed id.
    ///
    /// Adapters retry transient failures of this call.
    async fn set_membership(&self, rule: &MappingRule, enabled: bool) -> Result<MappingId>;

    /// Delete a rule
    async fn delete(&self, id: MappingId) -> Result<()>;

    /// Replace the order of enabled rules and return the echoed order
    async fn reorder(&self, enabled: &[MappingId]) -> Result<Vec<MappingId>>;
}

/// Persistence for the last reconciled order state
#[async_trait]
pub trait ObservedStateStore: Send + Sync {
    /// Load the last saved state, `None` if nothing was saved yet
    async fn load(&self) -> Result<Option<ObservedOrderState>>;

    /// Replace the saved state
    async fn save(&self, state: &ObservedOrderState) -> Result<()>;
}
