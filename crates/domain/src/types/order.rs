//! Order state for mapping rules
//!
//! Enabled rules form an ordered sequence (index `i` means position `i + 1`);
//! disabled rules form an unordered set.

use serde::{Deserialize, Serialize};

use super::mapping::MappingId;

/// Declared partitioning and order of mapping rules
///
/// Both lists must be disjoint and free of duplicates, and together must
/// cover exactly the ids that exist remotely. Reconciliation rejects any
/// violation instead of repairing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredOrderState {
    /// Enabled rule ids in evaluation order
    pub enabled: Vec<MappingId>,
    /// Disabled rule ids; order carries no meaning
    pub disabled: Vec<MappingId>,
}

impl DesiredOrderState {
    pub fn new(enabled: Vec<MappingId>, disabled: Vec<MappingId>) -> Self {
        Self { enabled, disabled }
    }

    /// 1-based position the given id should occupy, if it is desired enabled
    pub fn position_of(&self, id: MappingId) -> Option<usize> {
        self.enabled.iter().position(|candidate| *candidate == id).map(|index| index + 1)
    }

    /// Total number of ids across both partitions (duplicates included)
    pub fn len(&self) -> usize {
        self.enabled.len() + self.disabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty() && self.disabled.is_empty()
    }
}

/// Order state as last observed on the remote after reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedOrderState {
    /// Enabled rule ids sorted by remote position
    pub enabled: Vec<MappingId>,
    /// Disabled rule ids
    pub disabled: Vec<MappingId>,
}

impl From<DesiredOrderState> for ObservedOrderState {
    fn from(value: DesiredOrderState) -> Self {
        Self { enabled: value.enabled, disabled: value.disabled }
    }
}

impl From<ObservedOrderState> for DesiredOrderState {
    fn from(value: ObservedOrderState) -> Self {
        Self { enabled: value.enabled, disabled: value.disabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let desired = DesiredOrderState::new(vec![5, 3, 8], vec![1]);
        assert_eq!(desired.position_of(5), Some(1));
        assert_eq!(desired.position_of(8), Some(3));
        assert_eq!(desired.position_of(1), None);
    }

    #[test]
    fn parses_from_toml() {
        let desired: DesiredOrderState = toml::from_str("enabled = [5, 3]\ndisabled = [1]").unwrap();
        assert_eq!(desired, DesiredOrderState::new(vec![5, 3], vec![1]));
        assert_eq!(desired.len(), 3);
    }

    #[test]
    fn empty_state() {
        assert!(DesiredOrderState::default().is_empty());
    }
}
