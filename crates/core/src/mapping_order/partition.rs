//! Pure ordering and partition checks
//!
//! Nothing here talks to the remote. The reconciler feeds fetched rules and
//! the desired state through these helpers and acts on the result.

use std::collections::{BTreeMap, BTreeSet};

use rulesync_domain::{DesiredOrderState, MappingId, MappingRule, RuleSyncError};

use super::errors::{OutOfPosition, ReconcileError};

/// Enabled rules sorted by position, plus any rule whose position is not its
/// 1-based rank
#[derive(Debug, Clone, Default)]
pub struct EnabledOrder {
    pub rules: Vec<MappingRule>,
    pub out_of_position: Vec<OutOfPosition>,
}

impl EnabledOrder {
    pub fn is_contiguous(&self) -> bool {
        self.out_of_position.is_empty()
    }

    /// Ids in position order
    pub fn ids(&self) -> Result<Vec<MappingId>, ReconcileError> {
        self.rules.iter().map(remote_id).collect()
    }
}

/// Id of a rule fetched from the remote
///
/// # Errors
/// Returns [`ReconcileError::Remote`] if the remote returned a rule without
/// an id.
pub fn remote_id(rule: &MappingRule) -> Result<MappingId, ReconcileError> {
    rule.id.ok_or_else(|| {
        ReconcileError::Remote(RuleSyncError::Internal(format!(
            "remote returned mapping '{}' without an id",
            rule.name
        )))
    })
}

/// Sort enabled rules by position and check positions are exactly `1..N`.
///
/// Positions are never renumbered; anomalies are reported in
/// [`EnabledOrder::out_of_position`] for the caller to fail or warn on.
///
/// # Errors
/// Returns [`ReconcileError::NullPosition`] listing every enabled rule that
/// has no position.
pub fn order_enabled(mut rules: Vec<MappingRule>) -> Result<EnabledOrder, ReconcileError> {
    let missing: Vec<MappingId> =
        rules.iter().filter(|rule| rule.position.is_none()).map(|rule| rule.id.unwrap_or_default()).collect();
    if !missing.is_empty() {
        return Err(ReconcileError::NullPosition { ids: missing });
    }

    rules.sort_by_key(|rule| rule.position);

    let mut out_of_position = Vec::new();
    for (rank, rule) in (1_i64..).zip(&rules) {
        let actual = rule.position.unwrap_or_default();
        if actual != rank {
            out_of_position.push(OutOfPosition { id: remote_id(rule)?, actual, expected: rank });
        }
    }

    Ok(EnabledOrder { rules, out_of_position })
}

/// Desired membership validated against the remote id set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    pub enabled: BTreeSet<MappingId>,
    pub disabled: BTreeSet<MappingId>,
}

/// Check the desired state has no repeated ids and covers exactly
/// `remote_ids`.
///
/// # Errors
/// - [`ReconcileError::DuplicateIdInDesiredState`] if any id occurs more
///   than once across both lists
/// - [`ReconcileError::SetMismatch`] with the sorted symmetric difference
///   if the union differs from `remote_ids`
pub fn validate_desired(
    desired: &DesiredOrderState,
    remote_ids: &BTreeSet<MappingId>,
) -> Result<Membership, ReconcileError> {
    let mut seen: BTreeMap<MappingId, usize> = BTreeMap::new();
    for id in desired.enabled.iter().chain(&desired.disabled) {
        *seen.entry(*id).or_default() += 1;
    }
    let duplicates: Vec<MappingId> =
        seen.iter().filter(|(_, count)| **count > 1).map(|(id, _)| *id).collect();
    if !duplicates.is_empty() {
        return Err(ReconcileError::DuplicateIdInDesiredState { ids: duplicates });
    }

    let desired_ids: BTreeSet<MappingId> = seen.into_keys().collect();
    let (extra_in_desired, extra_in_remote) = symmetric_difference(&desired_ids, remote_ids);
    if !extra_in_desired.is_empty() || !extra_in_remote.is_empty() {
        return Err(ReconcileError::SetMismatch { extra_in_desired, extra_in_remote });
    }

    Ok(Membership {
        enabled: desired.enabled.iter().copied().collect(),
        disabled: desired.disabled.iter().copied().collect(),
    })
}

/// `(a \ b, b \ a)`, both sorted ascending
pub fn symmetric_difference(
    a: &BTreeSet<MappingId>,
    b: &BTreeSet<MappingId>,
) -> (Vec<MappingId>, Vec<MappingId>) {
    (a.difference(b).copied().collect(), b.difference(a).copied().collect())
}

/// First index where the echoed order differs from the requested one
///
/// # Errors
/// [`ReconcileError::ReorderLengthMismatch`] or
/// [`ReconcileError::ReorderOrderMismatch`].
pub fn verify_reorder_echo(requested: &[MappingId], echoed: &[MappingId]) -> Result<(), ReconcileError> {
    if requested.len() != echoed.len() {
        return Err(ReconcileError::ReorderLengthMismatch {
            expected: requested.len(),
            actual: echoed.len(),
        });
    }
    match requested.iter().zip(echoed).enumerate().find(|(_, (want, got))| want != got) {
        Some((index, (expected, actual))) => {
            Err(ReconcileError::ReorderOrderMismatch { index, expected: *expected, actual: *actual })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rulesync_domain::MatchMode;

    use super::*;

    fn enabled(id: MappingId, position: Option<i64>) -> MappingRule {
        let mut rule = MappingRule::new(format!("rule {id}"), MatchMode::All);
        rule.id = Some(id);
        rule.enabled = true;
        rule.position = position;
        rule
    }

    fn ids(values: &[MappingId]) -> BTreeSet<MappingId> {
        values.iter().copied().collect()
    }

    #[test]
    fn sorts_by_position() {
        let order =
            order_enabled(vec![enabled(8, Some(3)), enabled(3, Some(1)), enabled(5, Some(2))]).unwrap();
        assert!(order.is_contiguous());
        assert_eq!(order.ids().unwrap(), vec![3, 5, 8]);
    }

    #[test]
    fn gap_is_reported_not_renumbered() {
        let order =
            order_enabled(vec![enabled(1, Some(1)), enabled(2, Some(2)), enabled(3, Some(4))]).unwrap();
        assert_eq!(order.out_of_position, vec![OutOfPosition { id: 3, actual: 4, expected: 3 }]);
        assert_eq!(order.rules[2].position, Some(4));
    }

    #[test]
    fn duplicate_positions_are_reported() {
        let order = order_enabled(vec![enabled(1, Some(1)), enabled(2, Some(1))]).unwrap();
        assert_eq!(order.out_of_position.len(), 1);
        assert_eq!(order.out_of_position[0].expected, 2);
    }

    #[test]
    fn null_position_is_rejected() {
        let err = order_enabled(vec![enabled(1, Some(1)), enabled(7, None)]).unwrap_err();
        assert_eq!(err, ReconcileError::NullPosition { ids: vec![7] });
    }

    #[test]
    fn duplicates_across_lists_are_rejected() {
        let desired = DesiredOrderState::new(vec![1, 2], vec![2, 3]);
        let err = validate_desired(&desired, &ids(&[1, 2, 3])).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateIdInDesiredState { ids: vec![2] });
    }

    #[test]
    fn duplicates_within_one_list_are_rejected() {
        let desired = DesiredOrderState::new(vec![4, 4], vec![]);
        let err = validate_desired(&desired, &ids(&[4])).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateIdInDesiredState { ids: vec![4] });
    }

    #[test]
    fn set_mismatch_reports_both_sides_sorted() {
        let desired = DesiredOrderState::new(vec![9, 1], vec![2]);
        let err = validate_desired(&desired, &ids(&[1, 2, 5, 4])).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::SetMismatch { extra_in_desired: vec![9], extra_in_remote: vec![4, 5] }
        );
    }

    #[test]
    fn valid_desired_state_partitions() {
        let desired = DesiredOrderState::new(vec![5, 3, 8], vec![1]);
        let membership = validate_desired(&desired, &ids(&[1, 3, 5, 8])).unwrap();
        assert_eq!(membership.enabled, ids(&[3, 5, 8]));
        assert_eq!(membership.disabled, ids(&[1]));
    }

    #[test]
    fn reorder_echo_must_match_exactly() {
        assert!(verify_reorder_echo(&[5, 3, 8], &[5, 3, 8]).is_ok());
        assert_eq!(
            verify_reorder_echo(&[], &[1]).unwrap_err(),
            ReconcileError::ReorderLengthMismatch { expected: 0, actual: 1 }
        );
        assert_eq!(
            verify_reorder_echo(&[5, 3, 8], &[5, 8, 3]).unwrap_err(),
            ReconcileError::ReorderOrderMismatch { index: 1, expected: 3, actual: 8 }
        );
    }
}
