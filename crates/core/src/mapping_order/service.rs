//! Mapping order reconciliation service - core business logic

use std::collections::BTreeSet;
use std::sync::Arc;

use rulesync_domain::{DesiredOrderState, MappingId, MappingRule, ObservedOrderState};
use tracing::{debug, info, instrument, warn};

use super::errors::{OrderWarning, ReconcileError};
use super::partition::{
    order_enabled, remote_id, symmetric_difference, validate_desired, verify_reorder_echo,
    EnabledOrder,
};
use super::ports::{MappingRepository, ObservedStateStore};

/// Result of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// State now on the remote, also persisted to the state store
    pub state: ObservedOrderState,
    /// Rules moved from enabled to disabled, in the order they were toggled
    pub toggled_to_disabled: Vec<MappingId>,
    /// Rules moved from disabled to enabled, in the order they were toggled
    pub toggled_to_enabled: Vec<MappingId>,
    /// Whether the bulk reorder call was issued
    pub reordered: bool,
}

impl ReconcileOutcome {
    /// Number of mutating remote calls issued
    pub fn mutation_count(&self) -> usize {
        self.toggled_to_disabled.len() + self.toggled_to_enabled.len() + usize::from(self.reordered)
    }
}

/// Result of a read-only refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub state: ObservedOrderState,
    pub warnings: Vec<OrderWarning>,
}

/// Converges the remote enabled/disabled partition and enabled order onto a
/// desired state
///
/// One reconciliation runs at a time per caller. Overlapping reconciliations
/// against the same remote collection are not excluded and can race.
pub struct MappingOrderReconciler {
    repository: Arc<dyn MappingRepository>,
    store: Arc<dyn ObservedStateStore>,
}

impl MappingOrderReconciler {
    /// Create a new reconciler
    pub fn new(repository: Arc<dyn MappingRepository>, store: Arc<dyn ObservedStateStore>) -> Self {
        Self { repository, store }
    }

    /// Reconcile the remote onto `desired`.
    ///
    /// Steps: read and validate the enabled order, read the disabled set,
    /// validate the desired state against the remote ids, disable then
    /// enable rules whose membership changes, issue one bulk reorder, and
    /// persist the result. The reorder is skipped when no membership changed
    /// and the remote order already matches, so a converged re-run issues no
    /// mutations.
    ///
    /// # Errors
    /// Any [`ReconcileError`]; all are terminal for this attempt and the
    /// remote may be left with some toggles applied.
    #[instrument(skip_all, fields(enabled = desired.enabled.len(), disabled = desired.disabled.len()))]
    pub async fn reconcile(
        &self,
        desired: &DesiredOrderState,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        info!("reconciling mapping order");

        let enabled = self.fetch_enabled().await?;
        if !enabled.is_contiguous() {
            return Err(ReconcileError::InvariantViolation(enabled.out_of_position));
        }
        let disabled = self.repository.list_disabled().await?;

        let mut remote_ids: BTreeSet<MappingId> = BTreeSet::new();
        for rule in enabled.rules.iter().chain(&disabled) {
            remote_ids.insert(remote_id(rule)?);
        }
        let membership = validate_desired(desired, &remote_ids)?;

        let mut toggled_to_disabled = Vec::new();
        for rule in &enabled.rules {
            let id = remote_id(rule)?;
            if membership.disabled.contains(&id) {
                self.toggle(rule, id, false).await?;
                toggled_to_disabled.push(id);
            }
        }

        let mut toggled_to_enabled = Vec::new();
        for rule in &disabled {
            let id = remote_id(rule)?;
            if membership.enabled.contains(&id) {
                self.toggle(rule, id, true).await?;
                toggled_to_enabled.push(id);
            }
        }

        let toggled = !toggled_to_disabled.is_empty() || !toggled_to_enabled.is_empty();
        let reordered = toggled || enabled.ids()? != desired.enabled;
        if reordered {
            debug!(order = ?desired.enabled, "issuing bulk reorder");
            let echoed = self.repository.reorder(&desired.enabled).await?;
            verify_reorder_echo(&desired.enabled, &echoed)?;
        } else {
            debug!("remote already converged, skipping reorder");
        }

        let state = ObservedOrderState::from(desired.clone());
        self.store.save(&state).await?;

        let outcome = ReconcileOutcome { state, toggled_to_disabled, toggled_to_enabled, reordered };
        info!(mutations = outcome.mutation_count(), reordered, "mapping order reconciled");
        Ok(outcome)
    }

    /// Read the remote order without mutating anything.
    ///
    /// Position anomalies become warnings. The remote enabled order and the
    /// previously recorded disabled list are persisted as the new recorded
    /// state and returned.
    ///
    /// # Errors
    /// [`ReconcileError::DisabledDrift`] when the remote disabled set differs
    /// from `previous.disabled`, [`ReconcileError::NullPosition`] or a remote
    /// failure.
    #[instrument(skip_all)]
    pub async fn refresh(
        &self,
        previous: &ObservedOrderState,
    ) -> Result<RefreshOutcome, ReconcileError> {
        let enabled = self.fetch_enabled().await?;
        let mut warnings = Vec::new();
        let enabled_ids = enabled.ids()?;
        if !enabled.is_contiguous() {
            warnings.push(OrderWarning::PositionsNotContiguous(enabled.out_of_position));
        }

        let disabled = self.repository.list_disabled().await?;
        let remote_disabled = disabled.iter().map(remote_id).collect::<Result<BTreeSet<_>, _>>()?;
        let recorded_disabled: BTreeSet<MappingId> = previous.disabled.iter().copied().collect();
        let (missing_remotely, unexpected_remotely) =
            symmetric_difference(&recorded_disabled, &remote_disabled);
        if !missing_remotely.is_empty() || !unexpected_remotely.is_empty() {
            return Err(ReconcileError::DisabledDrift { missing_remotely, unexpected_remotely });
        }

        for warning in &warnings {
            warn!(%warning, "mapping order anomaly");
        }

        let state = ObservedOrderState { enabled: enabled_ids, disabled: previous.disabled.clone() };
        self.store.save(&state).await?;
        Ok(RefreshOutcome { state, warnings })
    }

    async fn fetch_enabled(&self) -> Result<EnabledOrder, ReconcileError> {
        let rules = self.repository.list_enabled().await?;
        order_enabled(rules)
    }

    async fn toggle(&self, rule: &MappingRule, id: MappingId, enabled: bool) -> Result<(), ReconcileError> {
        info!(id, enabled, "toggling mapping membership");
        let echoed = self.repository.set_membership(rule, enabled).await?;
        if echoed != id {
            return Err(ReconcileError::ToggleMismatch { expected: id, actual: echoed });
        }
        Ok(())
    }
}
