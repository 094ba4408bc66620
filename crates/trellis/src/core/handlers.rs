use std::collections::HashMap;

use crate::behavior::Behavior;

/// Per-node mapping from event name to the behaviors run for it.
///
/// Every present entry holds a non-empty list, kept in registration order.
/// Registering again for an event appends; nothing is ever replaced.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    /// Behavior lists by event name.
    table: HashMap<String, Vec<Behavior>>,
}

impl HandlerTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a behavior to an event's list.
    pub fn register(&mut self, event: impl Into<String>, behavior: Behavior) {
        self.table.entry(event.into()).or_default().push(behavior);
    }

    /// Is there at least one behavior for this event?
    pub fn has_handler(&self, event: &str) -> bool {
        self.table.contains_key(event)
    }

    /// The behaviors for an event, in registration order.
    pub fn get(&self, event: &str) -> Option<&[Behavior]> {
        self.table.get(event).map(Vec::as_slice)
    }

    /// Registered event names, sorted.
    pub fn events(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.table.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Number of events with at least one behavior.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Return true if no event is registered.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
