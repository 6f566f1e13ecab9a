use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry,
};
use lazy_static::lazy_static;
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,

    // Console side
    pub table_processes: IntGauge,
    pub snapshots_total: IntCounter,
    pub diffs_applied_total: IntCounter,
    pub diffs_rejected_total: IntCounter,
    pub actions_total: IntCounterVec,

    // Sampler side
    pub sampler_ticks_total: IntCounter,
    pub sampler_events_total: IntCounter,
    pub sampler_tracked_processes: IntGauge,
}

impl MetricsRegistry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let table_processes = register_int_gauge_with_registry!(
            Opts::new("console_table_processes", "Processes currently held in the console table"),
            registry
        )?;

        let snapshots_total = register_int_counter_with_registry!(
            Opts::new("console_snapshots_total", "Full snapshots loaded into the console table"),
            registry
        )?;

        let diffs_applied_total = register_int_counter_with_registry!(
            Opts::new("console_diffs_applied_total", "Diff events merged into the console table"),
            registry
        )?;

        let diffs_rejected_total = register_int_counter_with_registry!(
            Opts::new("console_diffs_rejected_total", "Malformed diff events refused by the console table"),
            registry
        )?;

        let actions_total = register_int_counter_vec_with_registry!(
            Opts::new("console_actions_total", "Action requests by action and outcome"),
            &["action", "outcome"],
            registry
        )?;

        let sampler_ticks_total = register_int_counter_with_registry!(
            Opts::new("sampler_ticks_total", "Sampling passes performed"),
            registry
        )?;

        let sampler_events_total = register_int_counter_with_registry!(
            Opts::new("sampler_events_total", "Non-empty diff events published"),
            registry
        )?;

        let sampler_tracked_processes = register_int_gauge_with_registry!(
            Opts::new("sampler_tracked_processes", "Processes in the latest sample"),
            registry
        )?;

        Ok(Self {
            registry,
            table_processes,
            snapshots_total,
            diffs_applied_total,
            diffs_rejected_total,
            actions_total,
            sampler_ticks_total,
            sampler_events_total,
            sampler_tracked_processes,
        })
    }

    pub fn record_action(&self, action: &str, outcome: &str) {
        self.actions_total.with_label_values(&[action, outcome]).inc();
    }

    pub fn render(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

lazy_static! {
    pub static ref METRICS: Arc<MetricsRegistry> =
        Arc::new(MetricsRegistry::new().expect("metric definitions are valid and unique"));
}
