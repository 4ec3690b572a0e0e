//! Metrics sink boundary.
//!
//! Storage, index, and permission code never touch `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.

use crate::{felt::Felt, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    EntityRead { table: Felt, felts: u64 },
    EntityWrite { table: Felt, felts: u64 },
    EntityDelete { table: Felt },
    IndexDelta { table: Felt, inserts: u64, removes: u64 },
    PermissionDenied { resource: Felt },
    PackedWords { words: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::EntityRead { table, felts } => {
                metrics::with_state_mut(|m| {
                    m.ops.entity_reads = m.ops.entity_reads.saturating_add(1);
                    m.ops.felts_read = m.ops.felts_read.saturating_add(felts);

                    let entry = m.table_mut(table);
                    entry.reads = entry.reads.saturating_add(1);
                    entry.felts_read = entry.felts_read.saturating_add(felts);
                });
            }

            MetricsEvent::EntityWrite { table, felts } => {
                metrics::with_state_mut(|m| {
                    m.ops.entity_writes = m.ops.entity_writes.saturating_add(1);
                    m.ops.felts_written = m.ops.felts_written.saturating_add(felts);

                    let entry = m.table_mut(table);
                    entry.writes = entry.writes.saturating_add(1);
                    entry.felts_written = entry.felts_written.saturating_add(felts);
                });
            }

            MetricsEvent::EntityDelete { table } => {
                metrics::with_state_mut(|m| {
                    m.ops.entity_deletes = m.ops.entity_deletes.saturating_add(1);

                    let entry = m.table_mut(table);
                    entry.deletes = entry.deletes.saturating_add(1);
                });
            }

            MetricsEvent::IndexDelta {
                table,
                inserts,
                removes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);

                    let entry = m.table_mut(table);
                    entry.index_inserts = entry.index_inserts.saturating_add(inserts);
                    entry.index_removes = entry.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::PermissionDenied { resource } => {
                metrics::with_state_mut(|m| {
                    m.ops.permission_denials = m.ops.permission_denials.saturating_add(1);

                    let entry = m.table_mut(resource);
                    entry.permission_denials = entry.permission_denials.saturating_add(1);
                });
            }

            MetricsEvent::PackedWords { words } => {
                metrics::with_state_mut(|m| {
                    m.ops.packed_words = m.ops.packed_words.saturating_add(words);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // clone out of the slot so the sink may itself record without re-borrowing
    let installed = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match installed {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::MetricsReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit path, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = previous;
            });
        }
    }

    let previous = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(previous);

    f()
}

///
/// TESTS
///
