//! One poll cycle: batches in, transformed entities out.

use std::sync::Arc;

use infragraph_transformers::{EntityWrapper, Registry, SyncBatch, TransformError};
use serde::Serialize;
use tracing::{info, warn};

use crate::store::GraphSink;

/// An event that could not be transformed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFailure {
    pub sync_type: String,
    pub error: TransformError,
}

/// Outcome of one cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub updates: Vec<EntityWrapper>,
    pub failures: Vec<EventFailure>,
}

impl CycleReport {
    pub fn events(&self) -> usize {
        self.updates.len() + self.failures.len()
    }

    /// Warnings raised across all successfully transformed events.
    pub fn warning_count(&self) -> usize {
        self.updates.iter().map(|u| u.warnings.len()).sum()
    }

    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            events: self.events(),
            transformed: self.updates.len(),
            failed: self.failures.len(),
            warnings: self.warning_count(),
        }
    }
}

/// Counts only, for logging and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub events: usize,
    pub transformed: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Runs poll-cycle batches through the registry.
///
/// Each event is transformed independently: a malformed event is recorded
/// in the report and the rest of the cycle carries on.
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<Registry>,
}

impl Pipeline {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Transform every record of every batch.
    pub fn process(&self, batches: Vec<SyncBatch>) -> CycleReport {
        let mut report = CycleReport::default();

        for batch in batches {
            for event in batch.into_events() {
                match self.registry.transform(&event) {
                    Ok(update) => report.updates.push(update),
                    Err(error) => {
                        warn!(sync_type = %event.sync_type(), error = %error, "dropping event");
                        report.failures.push(EventFailure {
                            sync_type: event.sync_type().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        report
    }

    /// Transform and apply to a sink.
    pub fn run_cycle<S: GraphSink>(&self, batches: Vec<SyncBatch>, sink: &mut S) -> CycleSummary {
        let report = self.process(batches);
        for update in &report.updates {
            sink.apply(update);
        }

        let summary = report.summary();
        info!(
            events = summary.events,
            transformed = summary.transformed,
            failed = summary.failed,
            warnings = summary.warnings,
            "cycle complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGraph;
    use serde_json::json;

    fn batches(value: serde_json::Value) -> Vec<SyncBatch> {
        serde_json::from_value(value).unwrap()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(Registry::with_all()))
    }

    #[test]
    fn test_malformed_event_does_not_abort_cycle() {
        let report = pipeline().process(batches(json!([{
            "sync_type": "nagios",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [
                {"service": "cpu_check", "resource_name": "host-1", "status": "OK"},
                {"resource_name": "host-1", "status": "OK"},
                {"service": "disk_check", "resource_name": "host-1", "status": "CRITICAL"}
            ]
        }])));

        assert_eq!(report.events(), 3);
        assert_eq!(report.updates.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].error,
            TransformError::missing("nagios", "service")
        );
    }

    #[test]
    fn test_unknown_sync_type_is_a_failure() {
        let registry = Registry::builder()
            .register_kind(infragraph_transformers::TransformerKind::Nagios)
            .build();
        let report = Pipeline::new(Arc::new(registry)).process(batches(json!([
            {"sync_type": "nova.host", "records": [{"host_name": "compute-1"}]}
        ])));

        assert!(report.updates.is_empty());
        assert_eq!(
            report.failures[0].error,
            TransformError::UnknownSyncType("nova.host".to_string())
        );
    }

    #[test]
    fn test_run_cycle_applies_to_sink() {
        let mut graph = MemoryGraph::new();
        let summary = pipeline().run_cycle(
            batches(json!([
                {
                    "sync_type": "nagios",
                    "sample_date": "2024-01-01T10:05:00Z",
                    "records": [{
                        "service": "cpu_check",
                        "resource_name": "vol-1",
                        "resource_type": "cinder.volume",
                        "status": "CRITICAL"
                    }]
                },
                {
                    "sync_type": "nova.host",
                    "sample_date": "2024-01-01T10:05:00Z",
                    "records": [{"host_name": "compute-1", "zone": "nova"}]
                }
            ])),
            &mut graph,
        );

        assert_eq!(
            summary,
            CycleSummary {
                events: 2,
                transformed: 2,
                failed: 0,
                warnings: 1,
            }
        );
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }
}
