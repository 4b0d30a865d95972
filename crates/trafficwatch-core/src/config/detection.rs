//! Detection emitter configuration.

use serde::{Deserialize, Serialize};

/// Periodic detection and broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Start the emitter with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between detection ticks.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Artificial latency of the synthetic detector.
    #[serde(default = "default_latency")]
    pub simulated_latency_ms: u64,
    /// Probability in `[0, 1]` that a tick yields an incident.
    #[serde(default = "default_probability")]
    pub emit_probability: f64,
    /// Address pool the synthetic detector draws locations from.
    #[serde(default = "default_addresses")]
    pub addresses: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            simulated_latency_ms: default_latency(),
            emit_probability: default_probability(),
            addresses: default_addresses(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    7
}

fn default_latency() -> u64 {
    1000
}

fn default_probability() -> f64 {
    1.0
}

fn default_addresses() -> Vec<String> {
    vec![
        "Via Verdi, 123 Trento".to_string(),
        "Piazza Duomo, Trento".to_string(),
        "Via Brennero, 45 Trento".to_string(),
        "Corso 3 Novembre, 10 Trento".to_string(),
    ]
}
