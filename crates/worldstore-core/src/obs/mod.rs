//! Observability: runtime metrics, the sink boundary they flow through, and
//! the record-changed event stream consumed by indexers.

pub mod event;
pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use event::{EventLog, EventSink, WorldEvent};
pub use metrics::{MetricsReport, TableCounters, WorldOps};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
