//! Shared pipeline state
//!
//! The state store is the only shared mutable resource in a pipeline run.
//! Every step in a run sees the same store; values are JSON so steps can
//! exchange strings, lists, or structured records without a schema.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared key/value bag for one pipeline run
///
/// Created empty at pipeline start, mutated in place by steps, and discarded
/// when the run ends. Cloning is cheap: clones share the same underlying map.
///
/// Concurrent writers (children of a parallel flow) must write to disjoint
/// keys. The store serializes individual operations through its lock but does
/// not arbitrate between two steps writing the same key.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl StateStore {
    /// Create an empty state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a key, if present
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().await.get(key).cloned()
    }

    /// Set a key to a value, replacing any previous value
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!(key = %key, "State set");
        self.inner.write().await.insert(key, value);
    }

    /// Append a value to the list stored at `key`
    ///
    /// A missing key becomes a one-element list. A scalar already at the key
    /// is folded into a list before appending, so appends never silently
    /// overwrite earlier values.
    pub async fn append(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut map = self.inner.write().await;
        let entry = map.entry(key.clone()).or_insert_with(|| Value::Array(vec![]));
        match entry {
            Value::Array(items) => items.push(value),
            existing => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
        }
        tracing::debug!(key = %key, "State append");
    }

    /// Take a point-in-time copy of the whole store
    ///
    /// Predicates evaluate against a snapshot so they stay synchronous and
    /// cannot observe writes made while they run.
    pub async fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            map: self.inner.read().await.clone(),
        }
    }

    /// Number of keys currently in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Immutable point-in-time view of a [`StateStore`]
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    map: HashMap<String, Value>,
}

impl StateSnapshot {
    /// Get the value for a key, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Get a string value for a key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// True when the key is absent, an empty string, or an empty list
    ///
    /// This is the totality guarantee predicates rely on: "no value yet" and
    /// "empty value" are the same answer, never an error.
    pub fn is_blank(&self, key: &str) -> bool {
        match self.map.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }

    /// Render the value at `key` as prompt text
    ///
    /// Strings render as-is; lists render as their items joined by blank
    /// lines; anything else renders as compact JSON. A missing key renders as
    /// the empty string, matching the optional `{ KEY? }` placeholder style.
    pub fn render(&self, key: &str) -> String {
        match self.map.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
            Some(other) => other.to_string(),
        }
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.map.iter()
    }

    /// Convert the snapshot into a JSON object
    pub fn into_json(self) -> Value {
        Value::Object(self.map.into_iter().collect())
    }
}
