use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parley_core::Intent;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct EngineMetrics {
    requests_total: AtomicU64,
    intent_totals: [AtomicU64; Intent::ALL.len()],
    choice_extractions_total: AtomicU64,
    shortfall_fills_total: AtomicU64,
    truncated_inputs_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub intents: BTreeMap<&'static str, u64>,
    pub choice_extractions_total: u64,
    pub shortfall_fills_total: u64,
    pub truncated_inputs_total: u64,
    pub avg_latency_micros: f64,
}

impl EngineMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_intent(&self, intent: Intent) {
        self.intent_totals[intent.index()].fetch_add(1, Ordering::Relaxed);
        metrics::counter!("parley_suggestions_total", "intent" => intent.as_str()).increment(1);
    }

    pub fn inc_choice_extraction(&self) {
        self.choice_extractions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_shortfall_fill(&self) {
        self.shortfall_fills_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_truncated_input(&self) {
        self.truncated_inputs_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("parley_truncated_inputs_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            intents: Intent::ALL
                .iter()
                .map(|intent| {
                    (
                        intent.as_str(),
                        self.intent_totals[intent.index()].load(Ordering::Relaxed),
                    )
                })
                .collect(),
            choice_extractions_total: self.choice_extractions_total.load(Ordering::Relaxed),
            shortfall_fills_total: self.shortfall_fills_total.load(Ordering::Relaxed),
            truncated_inputs_total: self.truncated_inputs_total.load(Ordering::Relaxed),
            avg_latency_micros: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

/// JSON logs to stderr; stdout is left for command output.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,parley_engine=info,parley_api=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(service = service_name, "tracing initialized");
    });
}
