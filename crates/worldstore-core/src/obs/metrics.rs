use crate::felt::Felt;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// MetricsState
/// Ephemeral, in-memory counters for world operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct MetricsState {
    pub(crate) ops: WorldOps,
    pub(crate) tables: BTreeMap<String, TableCounters>,
}

impl MetricsState {
    pub(crate) fn table_mut(&mut self, table: Felt) -> &mut TableCounters {
        self.tables.entry(format!("{table:#x}")).or_default()
    }
}

///
/// WorldOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorldOps {
    // Entity dispatch
    pub entity_reads: u64,
    pub entity_writes: u64,
    pub entity_deletes: u64,
    pub felts_read: u64,
    pub felts_written: u64,

    // Index maintenance
    pub index_inserts: u64,
    pub index_removes: u64,

    // Codec
    pub packed_words: u64,

    pub permission_denials: u64,
}

///
/// TableCounters
/// Per-table counters, keyed by the table selector in hex.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub reads: u64,
    pub writes: u64,
    pub deletes: u64,
    pub felts_read: u64,
    pub felts_written: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
    pub permission_denials: u64,
}

///
/// MetricsReport
/// Point-in-time snapshot of the metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MetricsReport {
    pub ops: WorldOps,
    pub tables: BTreeMap<String, TableCounters>,
}

thread_local! {
    static METRICS_STATE: RefCell<MetricsState> = RefCell::new(MetricsState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&MetricsState) -> R) -> R {
    METRICS_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsState) -> R) -> R {
    METRICS_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = MetricsState::default());
}

pub(crate) fn report() -> MetricsReport {
    with_state(|m| MetricsReport {
        ops: m.ops.clone(),
        tables: m.tables.clone(),
    })
}

///
/// TESTS
///
