use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transfer::domain::Value;

/// Layered policy options: nationwide defaults, per-state overrides, and
/// system-wide overrides applied on top of both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionRegistry {
    default: BTreeMap<String, Value>,
    states: BTreeMap<String, BTreeMap<String, Value>>,
    system: BTreeMap<String, Value>,
}

impl OptionRegistry {
    pub fn new(
        default: BTreeMap<String, Value>,
        states: BTreeMap<String, BTreeMap<String, Value>>,
        system: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            default,
            states,
            system,
        }
    }

    /// Nationwide defaults consumed by the standard rule pipeline. State and
    /// system layers are empty; deployments layer their own policy on top.
    pub fn standard() -> Self {
        let default = BTreeMap::from([
            ("Child Age Threshold".to_string(), Value::Integer(19)),
            ("CHIP Age Threshold".to_string(), Value::Integer(19)),
            ("Adult Group Minimum Age".to_string(), Value::Integer(19)),
            ("Adult Group Maximum Age".to_string(), Value::Integer(64)),
            (
                "State Medicaid Expansion".to_string(),
                Value::Text("N".to_string()),
            ),
            (
                "State Covers Optional Targeted Low Income Children".to_string(),
                Value::Text("N".to_string()),
            ),
            (
                "Caretaker Relative Relationship Codes".to_string(),
                Value::List(vec![
                    Value::Text("01".to_string()),
                    Value::Text("02".to_string()),
                    Value::Text("03".to_string()),
                    Value::Text("04".to_string()),
                ]),
            ),
            (
                "Non-MAGI Referral Age Threshold".to_string(),
                Value::Integer(65),
            ),
        ]);
        Self::new(default, BTreeMap::new(), BTreeMap::new())
    }

    /// Replaces the override layer for one state.
    pub fn with_state(mut self, state: impl Into<String>, overrides: BTreeMap<String, Value>) -> Self {
        self.states.insert(state.into(), overrides);
        self
    }

    /// Replaces the system-wide override layer.
    pub fn with_system(mut self, overrides: BTreeMap<String, Value>) -> Self {
        self.system = overrides;
        self
    }

    /// Collapses the layers for one state. Later layers win on key
    /// collision: default, then the state's overrides, then system overrides.
    pub fn resolve(&self, state: &str) -> ResolvedConfig {
        let mut options = self.default.clone();
        if let Some(overrides) = self.states.get(state) {
            options.extend(overrides.clone());
        }
        options.extend(self.system.clone());
        ResolvedConfig { options }
    }
}

/// The flat option set a single determination run reads policy from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedConfig {
    options: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::integer)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::text)
    }

    pub fn is_yes(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_yes)
    }

    /// Text entries of a list option, skipping non-text members.
    pub fn text_list(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(Value::List(values)) => values.iter().filter_map(Value::text).collect(),
            _ => Vec::new(),
        }
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }
}
