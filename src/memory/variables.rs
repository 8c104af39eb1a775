//! Ordered variable store
//!
//! Identifiers map to [`Value`]s. Iteration yields variables in the order they
//! were first bound, which is the order the variables pane shows them in.

use super::value::Value;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    order: Vec<String>,
    values: FxHashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Bind `name` to `value`, returning the previous value if there was one.
    /// A rebound name keeps its original display position.
    pub fn set(&mut self, name: &str, value: Value) -> Option<Value> {
        let previous = self.values.insert(name.to_string(), value);
        if previous.is_none() {
            self.order.push(name.to_string());
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(name, value)` pairs in binding order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.values.clear();
    }
}
