//! Declared identities (functions, events) and the per-thread registries
//! that resolve them by declared id.

use super::{EventId, FunctionId, Timestamp};
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that is declared once with an id and then referenced by it
pub trait Declared {
    fn id(&self) -> u64;
    fn label(&self) -> &str;
}

/// A callable declared on a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionIdentity {
    id: FunctionId,
    label: String,
}

impl FunctionIdentity {
    pub fn new(id: FunctionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> FunctionId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Declared for FunctionIdentity {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// A discrete event declared on a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIdentity {
    id: EventId,
    label: String,
}

impl EventIdentity {
    pub fn new(id: EventId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Declared for EventIdentity {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// One emission of a declared event
#[derive(Debug, Clone, PartialEq)]
pub struct EventOccurrence {
    event: Arc<EventIdentity>,
    time: Timestamp,
}

impl EventOccurrence {
    pub fn new(event: Arc<EventIdentity>, time: Timestamp) -> Self {
        Self { event, time }
    }

    pub fn event(&self) -> &EventIdentity {
        &self.event
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }
}

/// Declaration-ordered identities with lookup by declared id.
///
/// Declaration order and declared ids are independent: a trace may declare
/// id 7 before id 2 and both still resolve. Re-declaring an id keeps both
/// entries in order but later lookups resolve to the newest one.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<Arc<T>>,
    index: HashMap<u64, usize>,
}

impl<T: Declared> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a new identity and return the shared handle to it
    pub fn declare(&mut self, item: T) -> Arc<T> {
        let id = item.id();
        let item = Arc::new(item);

        if self.index.insert(id, self.entries.len()).is_some() {
            warn!(
                "Id {} declared twice, later references resolve to '{}'",
                id,
                item.label()
            );
        }
        self.entries.push(Arc::clone(&item));

        item
    }

    /// Resolve an identity by its declared id
    pub fn get(&self, id: u64) -> Option<&Arc<T>> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    /// Identities in declaration order
    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another registry's declarations after ours.
    ///
    /// Ids already known here keep resolving to our own declaration.
    pub fn extend(&mut self, other: Registry<T>) {
        for item in other.entries {
            let position = self.entries.len();
            self.index.entry(item.id()).or_insert(position);
            self.entries.push(item);
        }
    }
}

impl<T: Declared> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
