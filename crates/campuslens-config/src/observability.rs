use std::env;

#[derive(Clone, Debug, Default)]
pub struct ObservabilityConfig {
    /// Enables the Prometheus recorder and the `/metrics` route
    pub enabled: bool,
    /// OTLP collector; tracing export is skipped when unset
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("OBSERVABILITY_ENABLED")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "campuslens".to_string()),
        }
    }
}
