//! Prometheus counters and the /metrics handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus_client::{
    encoding::text::encode,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};
use std::sync::Arc;

use crate::routes::AppState;

type Labels = Vec<(String, String)>;

#[derive(Clone, Default)]
pub struct NotaryMetrics {
    notarize_requests: Family<Labels, Counter>,
    inscriptions: Family<Labels, Counter>,
}

impl NotaryMetrics {
    pub fn register(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        registry.register(
            "wcn_notarize_requests",
            "Notarize requests by outcome",
            metrics.notarize_requests.clone(),
        );
        registry.register(
            "wcn_inscriptions",
            "Inscriptions made by provider binding",
            metrics.inscriptions.clone(),
        );
        metrics
    }

    pub fn notarize_request(&self, outcome: &str) {
        self.notarize_requests
            .get_or_create(&vec![("outcome".to_string(), outcome.to_string())])
            .inc();
    }

    pub fn inscriptions(&self, provider: &str, count: u64) {
        self.inscriptions
            .get_or_create(&vec![("provider".to_string(), provider.to_string())])
            .inc_by(count);
    }
}

/// Registry plus the counters registered in it
pub fn new_registry() -> (Arc<Registry>, NotaryMetrics) {
    let mut registry = Registry::default();
    let metrics = NotaryMetrics::register(&mut registry);
    (Arc::new(registry), metrics)
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::new();
    match encode(&mut body, &state.registry) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            tracing::error!("metrics encode failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                e.to_string(),
            )
        }
    }
}
