//! Mapping rule types
//!
//! A mapping rule is a conditional policy entry evaluated by the identity
//! provider. Enabled rules carry a 1-based `position` that fixes evaluation
//! order; disabled rules have no position.

use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Server-assigned mapping rule identifier
pub type MappingId = i64;

/// How a rule's conditions are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every condition must match
    All,
    /// At least one condition must match
    Any,
}

impl_wire_enum_conversions!(MatchMode {
    All => "all",
    Any => "any",
});

/// A single condition of a mapping rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingCondition {
    pub source: String,
    pub operator: String,
    pub value: String,
}

/// An action applied when a mapping rule matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingAction {
    pub action: String,
    pub value: Vec<String>,
}

/// Mapping rule as exchanged with the identity provider
///
/// `id` is omitted from request bodies when absent. `position` is always
/// serialized (as `null` when absent) because the remote treats a missing
/// field differently from an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MappingId>,
    pub name: String,
    #[serde(rename = "match")]
    pub match_mode: MatchMode,
    pub enabled: bool,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<MappingCondition>,
    #[serde(default)]
    pub actions: Vec<MappingAction>,
}

impl MappingRule {
    /// Create a new, not yet persisted, disabled rule
    pub fn new(name: impl Into<String>, match_mode: MatchMode) -> Self {
        Self {
            id: None,
            name: name.into(),
            match_mode,
            enabled: false,
            position: None,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Append a condition
    pub fn with_condition(
        mut self,
        source: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.conditions.push(MappingCondition {
            source: source.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    /// Append an action
    pub fn with_action(mut self, action: impl Into<String>, values: Vec<String>) -> Self {
        self.actions.push(MappingAction { action: action.into(), value: values });
        self
    }

    /// Request body that moves this rule to the given membership.
    ///
    /// The id is stripped (it travels in the path) and the position is
    /// cleared: the remote assigns positions only through the bulk reorder
    /// call.
    pub fn membership_body(&self, enabled: bool) -> Self {
        Self { id: None, enabled, position: None, ..self.clone() }
    }

    /// Short human-readable label used in logs and error details
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("{} (id {})", self.name, id),
            None => format!("{} (unsaved)", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> MappingRule {
        MappingRule::new("Contractors", MatchMode::All)
            .with_condition("member_of", "contains", "contractors")
            .with_action("add_role", vec!["123".to_string()])
    }

    #[test]
    fn new_rule_is_disabled_without_position() {
        let rule = sample();
        assert!(!rule.enabled);
        assert_eq!(rule.position, None);
        assert_eq!(rule.id, None);
    }

    #[test]
    fn serializes_null_position_and_omits_missing_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["position"], serde_json::Value::Null);
        assert_eq!(value["match"], "all");
        assert_eq!(value["actions"][0]["value"][0], "123");
    }

    #[test]
    fn deserializes_remote_payload() {
        let rule: MappingRule = serde_json::from_value(json!({
            "id": 7,
            "name": "Admins",
            "match": "any",
            "enabled": true,
            "position": 2,
            "conditions": [{"source": "has_role", "operator": "ri", "value": "9"}],
            "actions": [{"action": "set_status", "value": ["1"]}]
        }))
        .unwrap();

        assert_eq!(rule.id, Some(7));
        assert_eq!(rule.match_mode, MatchMode::Any);
        assert_eq!(rule.position, Some(2));
        assert_eq!(rule.conditions.len(), 1);
    }

    #[test]
    fn membership_body_clears_identity_and_position() {
        let mut rule = sample();
        rule.id = Some(11);
        rule.enabled = true;
        rule.position = Some(3);

        let body = rule.membership_body(false);
        assert_eq!(body.id, None);
        assert_eq!(body.position, None);
        assert!(!body.enabled);
        assert_eq!(body.conditions, rule.conditions);
    }

    #[test]
    fn match_mode_parses_from_wire_string() {
        assert_eq!("ANY".parse::<MatchMode>().unwrap(), MatchMode::Any);
        assert_eq!(MatchMode::All.to_string(), "all");
    }
}
