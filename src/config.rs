//! Simulation limits and defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{MAX_QUBITS, MAX_TIME_STEPS};

/// Settings applied to every request unless the request overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest accepted qubit count. Clamped to [`MAX_QUBITS`].
    pub max_qubits: usize,
    /// Number of time steps a circuit may use. Clamped to [`MAX_TIME_STEPS`].
    pub max_time_steps: usize,
    /// Shots drawn when a request does not say.
    pub shots: usize,
    /// Fixed RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_qubits: 8,
            max_time_steps: 64,
            shots: 500,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn qubit_limit(&self) -> usize {
        self.max_qubits.min(MAX_QUBITS)
    }

    pub fn time_step_limit(&self) -> usize {
        self.max_time_steps.min(MAX_TIME_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{ "shots": 64 }"#).unwrap();

        assert_eq!(64, config.shots);
        assert_eq!(8, config.max_qubits);
        assert_eq!(None, config.seed);
    }

    #[test]
    fn test_qubit_limit_is_clamped() {
        let config = SimConfig {
            max_qubits: 1000,
            ..SimConfig::default()
        };
        assert_eq!(MAX_QUBITS, config.qubit_limit());
    }

    #[test]
    fn test_time_step_limit_is_clamped() {
        assert_eq!(64, SimConfig::default().time_step_limit());

        let config: SimConfig = serde_json::from_str(r#"{ "max_time_steps": 100000 }"#).unwrap();
        assert_eq!(MAX_TIME_STEPS, config.time_step_limit());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load(Path::new("/nonexistent/qsim.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
