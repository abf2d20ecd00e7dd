//! In-memory port implementations
//!
//! `InMemoryMappingRepository` models the remote closely enough for the
//! reconciler: disabling a rule clears its position and closes the gap,
//! enabling one appends it at the end, and the bulk reorder renumbers
//! `1..N` in the requested order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rulesync_core::{MappingRepository, ObservedStateStore};
use rulesync_domain::{
    MappingId, MappingRule, MatchMode, ObservedOrderState, Result as DomainResult, RuleSyncError,
};

/// A call made against the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListEnabled,
    ListDisabled,
    Get(MappingId),
    Create(MappingRule),
    Update(MappingId, MappingRule),
    SetMembership { id: MappingId, enabled: bool },
    Delete(MappingId),
    Reorder(Vec<MappingId>),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListEnabled | Self::ListDisabled | Self::Get(_))
    }
}

#[derive(Default)]
struct Remote {
    rules: BTreeMap<MappingId, MappingRule>,
    calls: Vec<Call>,
    next_id: MappingId,
    reorder_echo: Option<Vec<MappingId>>,
    membership_echo: Option<MappingId>,
    failure: Option<RuleSyncError>,
}

impl Remote {
    fn enabled_in_order(&self) -> Vec<MappingId> {
        let mut enabled: Vec<(i64, MappingId)> = self
            .rules
            .values()
            .filter(|rule| rule.enabled)
            .map(|rule| (rule.position.unwrap_or(i64::MAX), rule.id.unwrap_or_default()))
            .collect();
        enabled.sort_unstable();
        enabled.into_iter().map(|(_, id)| id).collect()
    }

    fn renumber(&mut self, order: &[MappingId]) {
        for (position, id) in (1_i64..).zip(order) {
            if let Some(rule) = self.rules.get_mut(id) {
                rule.position = Some(position);
            }
        }
    }

    fn take_failure(&mut self) -> DomainResult<()> {
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory stand-in for the remote mapping collection.
#[derive(Clone, Default)]
pub struct InMemoryMappingRepository {
    remote: Arc<Mutex<Remote>>,
}

pub fn rule(id: MappingId) -> MappingRule {
    let mut rule = MappingRule::new(format!("rule {id}"), MatchMode::All)
        .with_condition("has_role", "ri", id.to_string())
        .with_action("set_status", vec!["1".to_string()]);
    rule.id = Some(id);
    rule
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        let repo = Self::default();
        repo.remote.lock().unwrap().next_id = 1000;
        repo
    }

    /// Seed enabled rules at positions 1..N in the given order.
    pub fn with_enabled(self, ids: &[MappingId]) -> Self {
        let positioned: Vec<(MappingId, i64)> = ids.iter().copied().zip(1_i64..).collect();
        self.with_positions(&positioned)
    }

    /// Seed enabled rules at explicit positions (possibly broken).
    pub fn with_positions(self, entries: &[(MappingId, i64)]) -> Self {
        {
            let mut remote = self.remote.lock().unwrap();
            for (id, position) in entries {
                let mut seeded = rule(*id);
                seeded.enabled = true;
                seeded.position = Some(*position);
                remote.rules.insert(*id, seeded);
            }
        }
        self
    }

    /// Seed an enabled rule with no position.
    pub fn with_unpositioned(self, id: MappingId) -> Self {
        {
            let mut seeded = rule(id);
            seeded.enabled = true;
            self.remote.lock().unwrap().rules.insert(id, seeded);
        }
        self
    }

    /// Seed disabled rules.
    pub fn with_disabled(self, ids: &[MappingId]) -> Self {
        {
            let mut remote = self.remote.lock().unwrap();
            for id in ids {
                remote.rules.insert(*id, rule(*id));
            }
        }
        self
    }

    /// Make every reorder call echo `echo` instead of the applied order.
    pub fn echo_reorder(self, echo: Vec<MappingId>) -> Self {
        self.remote.lock().unwrap().reorder_echo = Some(echo);
        self
    }

    /// Make every membership toggle echo `id`.
    pub fn echo_membership(self, id: MappingId) -> Self {
        self.remote.lock().unwrap().membership_echo = Some(id);
        self
    }

    /// Fail the next call with `err`.
    pub fn fail_next(&self, err: RuleSyncError) {
        self.remote.lock().unwrap().failure = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.remote.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.remote.lock().unwrap().calls.clear();
    }

    /// Enabled ids by position.
    pub fn enabled_order(&self) -> Vec<MappingId> {
        self.remote.lock().unwrap().enabled_in_order()
    }

    /// `(id, position)` for every enabled rule, by position.
    pub fn enabled_positions(&self) -> Vec<(MappingId, i64)> {
        let remote = self.remote.lock().unwrap();
        remote
            .enabled_in_order()
            .into_iter()
            .map(|id| (id, remote.rules[&id].position.unwrap_or_default()))
            .collect()
    }

    /// Disabled ids, ascending.
    pub fn disabled_ids(&self) -> Vec<MappingId> {
        let remote = self.remote.lock().unwrap();
        remote.rules.values().filter(|rule| !rule.enabled).filter_map(|rule| rule.id).collect()
    }

    pub fn stored(&self, id: MappingId) -> Option<MappingRule> {
        self.remote.lock().unwrap().rules.get(&id).cloned()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn list_enabled(&self) -> DomainResult<Vec<MappingRule>> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::ListEnabled);
        remote.take_failure()?;
        // Reverse id order so callers cannot rely on the listing being sorted.
        Ok(remote.rules.values().rev().filter(|rule| rule.enabled).cloned().collect())
    }

    async fn list_disabled(&self) -> DomainResult<Vec<MappingRule>> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::ListDisabled);
        remote.take_failure()?;
        Ok(remote.rules.values().filter(|rule| !rule.enabled).cloned().collect())
    }

    async fn get(&self, id: MappingId) -> DomainResult<MappingRule> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Get(id));
        remote.take_failure()?;
        remote.rules.get(&id).cloned().ok_or_else(|| RuleSyncError::NotFound(format!("mapping {id}")))
    }

    async fn create(&self, rule: &MappingRule) -> DomainResult<MappingId> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Create(rule.clone()));
        remote.take_failure()?;
        remote.next_id += 1;
        let id = remote.next_id;
        remote.rules.insert(id, MappingRule { id: Some(id), ..rule.clone() });
        Ok(id)
    }

    async fn update(&self, id: MappingId, rule: &MappingRule) -> DomainResult<MappingId> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Update(id, rule.clone()));
        remote.take_failure()?;
        let stored = remote
            .rules
            .get_mut(&id)
            .ok_or_else(|| RuleSyncError::NotFound(format!("mapping {id}")))?;
        let position = stored.position;
        *stored = MappingRule { id: Some(id), position, ..rule.clone() };
        Ok(id)
    }

    async fn set_membership(&self, rule: &MappingRule, enabled: bool) -> DomainResult<MappingId> {
        let id = rule.id.unwrap_or_default();
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::SetMembership { id, enabled });
        remote.take_failure()?;

        let mut order = remote.enabled_in_order();
        order.retain(|candidate| *candidate != id);
        let stored =
            remote.rules.get_mut(&id).ok_or_else(|| RuleSyncError::NotFound(format!("mapping {id}")))?;
        stored.enabled = enabled;
        stored.position = None;
        if enabled {
            order.push(id);
        }
        remote.renumber(&order);

        Ok(remote.membership_echo.unwrap_or(id))
    }

    async fn delete(&self, id: MappingId) -> DomainResult<()> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Delete(id));
        remote.take_failure()?;
        remote
            .rules
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RuleSyncError::NotFound(format!("mapping {id}")))
    }

    async fn reorder(&self, enabled: &[MappingId]) -> DomainResult<Vec<MappingId>> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Reorder(enabled.to_vec()));
        remote.take_failure()?;
        remote.renumber(enabled);
        Ok(remote.reorder_echo.clone().unwrap_or_else(|| enabled.to_vec()))
    }
}

/// In-memory `ObservedStateStore` counting saves.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    saved: Arc<Mutex<Vec<ObservedOrderState>>>,
}

impl InMemoryStateStore {
    pub fn saves(&self) -> Vec<ObservedOrderState> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObservedStateStore for InMemoryStateStore {
    async fn load(&self) -> DomainResult<Option<ObservedOrderState>> {
        Ok(self.saved.lock().unwrap().last().cloned())
    }

    async fn save(&self, state: &ObservedOrderState) -> DomainResult<()> {
        self.saved.lock().unwrap().push(state.clone());
        Ok(())
    }
}
