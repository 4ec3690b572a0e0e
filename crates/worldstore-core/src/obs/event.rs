//! Record-changed notifications.
//!
//! Every successful world mutation emits exactly one [`WorldEvent`], in call
//! order. Off-chain indexers rebuild state from this stream instead of
//! reading storage.

use crate::felt::{ContractAddress, Felt};

///
/// WorldEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WorldEvent {
    StoreSetRecord {
        selector: Felt,
        entity_id: Felt,
        keys: Vec<Felt>,
        values: Vec<Felt>,
    },
    StoreUpdateRecord {
        selector: Felt,
        entity_id: Felt,
        values: Vec<Felt>,
    },
    StoreUpdateMember {
        selector: Felt,
        entity_id: Felt,
        member_selector: Felt,
        values: Vec<Felt>,
    },
    StoreDelRecord {
        selector: Felt,
        entity_id: Felt,
    },
    NamespaceRegistered {
        namespace: String,
        hash: Felt,
    },
    ModelRegistered {
        name: String,
        namespace: String,
        address: ContractAddress,
    },
    EventRegistered {
        name: String,
        namespace: String,
        address: ContractAddress,
    },
    ContractRegistered {
        name: String,
        namespace: String,
        address: ContractAddress,
    },
    OwnerUpdated {
        resource: Felt,
        principal: ContractAddress,
        value: bool,
    },
    WriterUpdated {
        resource: Felt,
        principal: ContractAddress,
        value: bool,
    },
}

impl WorldEvent {
    /// Table selector for store events.
    #[must_use]
    pub const fn selector(&self) -> Option<Felt> {
        match self {
            Self::StoreSetRecord { selector, .. }
            | Self::StoreUpdateRecord { selector, .. }
            | Self::StoreUpdateMember { selector, .. }
            | Self::StoreDelRecord { selector, .. } => Some(*selector),
            _ => None,
        }
    }
}

///
/// EventSink
///

pub trait EventSink {
    fn emit(&mut self, event: WorldEvent);
}

///
/// EventLog
/// Append-only, in-memory event sink.
///

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<WorldEvent>,
}

impl EventLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[must_use]
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    #[must_use]
    pub fn last(&self) -> Option<&WorldEvent> {
        self.events.last()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every buffered event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_emit_order() {
        let mut log = EventLog::new();
        log.emit(WorldEvent::StoreDelRecord {
            selector: Felt::ONE,
            entity_id: Felt::ZERO,
        });
        log.emit(WorldEvent::NamespaceRegistered {
            namespace: "ns".to_string(),
            hash: Felt::ONE,
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].selector(), Some(Felt::ONE));
        assert_eq!(log.last().and_then(WorldEvent::selector), None);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
