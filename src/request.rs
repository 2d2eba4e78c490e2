//! Request and response documents, and the validation that turns a request
//! into a [`Circuit`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::circuit::{check_num_of_qbits, validate_gates, Circuit, Gate};
use crate::config::SimConfig;
use crate::error::{CircuitError, CircuitResult};
use crate::gates::GateSymbol;
use crate::qstate::InitState;
use crate::sampler::Histogram;

fn default_num_qubits() -> usize {
    2
}

/// One gate as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<usize>,
    #[serde(default)]
    pub time: usize,
}

impl GateSpec {
    fn to_gate(&self, index: usize) -> CircuitResult<Gate> {
        match self.kind.trim().to_ascii_uppercase().as_str() {
            "CNOT" | "CX" => {
                let control = self
                    .control
                    .ok_or(CircuitError::MissingControl { gate: Some(index) })?;
                Ok(Gate::CNot {
                    control,
                    target: self.target,
                    time: self.time,
                })
            }
            _ => {
                let symbol = self
                    .kind
                    .parse::<GateSymbol>()
                    .map_err(|err| err.with_gate(index))?;
                Ok(Gate::Single {
                    symbol,
                    target: self.target,
                    time: self.time,
                })
            }
        }
    }
}

impl From<&Gate> for GateSpec {
    fn from(gate: &Gate) -> Self {
        match *gate {
            Gate::Single {
                symbol,
                target,
                time,
            } => Self {
                kind: symbol.to_string(),
                target,
                control: None,
                time,
            },
            Gate::CNot {
                control,
                target,
                time,
            } => Self {
                kind: "CNOT".to_string(),
                target,
                control: Some(control),
                time,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default = "default_num_qubits")]
    pub n_qubits: usize,
    #[serde(default)]
    pub gates: Vec<GateSpec>,
    /// One label per qubit; all `|0⟩` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_states: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            n_qubits: default_num_qubits(),
            gates: Vec::new(),
            init_states: None,
            shots: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub diagram: String,
    pub results: Histogram,
}

impl SimulationRequest {
    /// Validate the whole request and build its circuit.
    ///
    /// Every problem found is reported in one error.
    pub fn to_circuit(&self, config: &SimConfig) -> CircuitResult<Circuit> {
        let mut errors = Vec::new();
        self.check_into(config, &mut errors)
            .ok_or_else(|| aggregate_nonempty(errors))
    }

    fn check_into(&self, config: &SimConfig, errors: &mut Vec<CircuitError>) -> Option<Circuit> {
        let num_of_qbits = self.n_qubits;
        let count_ok = match check_num_of_qbits(num_of_qbits, config.qubit_limit()) {
            Ok(()) => true,
            Err(err) => {
                errors.push(err);
                false
            }
        };

        let init_states = match &self.init_states {
            None if count_ok => vec![InitState::Zero; num_of_qbits],
            None => Vec::new(),
            Some(labels) => {
                if labels.len() != num_of_qbits {
                    errors.push(CircuitError::InitStateCountMismatch {
                        expected: num_of_qbits,
                        got: labels.len(),
                    });
                }
                labels
                    .iter()
                    .enumerate()
                    .filter_map(|(qubit, label)| {
                        let init = InitState::from_label(label);
                        if init.is_none() {
                            errors.push(CircuitError::InvalidInitState {
                                qubit,
                                label: label.clone(),
                            });
                        }
                        init
                    })
                    .collect()
            }
        };

        let mut indexed = Vec::with_capacity(self.gates.len());
        for (index, spec) in self.gates.iter().enumerate() {
            match spec.to_gate(index) {
                Ok(gate) => indexed.push((index, gate)),
                Err(err) => errors.push(err),
            }
        }
        errors.extend(validate_gates(
            num_of_qbits,
            config.time_step_limit(),
            &indexed,
        ));

        if !errors.is_empty() {
            return None;
        }

        let gates = indexed.into_iter().map(|(_, gate)| gate).collect();
        Some(Circuit::from_validated(gates, init_states))
    }

    /// Validate, simulate and render, or fail without partial output.
    #[instrument(skip(self, config), fields(n_qubits = self.n_qubits, gates = self.gates.len()))]
    pub fn simulate(&self, config: &SimConfig) -> CircuitResult<SimulationResponse> {
        let shots = self.shots.unwrap_or(config.shots);

        let mut errors = Vec::new();
        if shots == 0 {
            errors.push(CircuitError::InvalidShots);
        }
        let circuit = self.check_into(config, &mut errors);
        let circuit = match circuit {
            Some(circuit) if errors.is_empty() => circuit,
            _ => {
                let err = aggregate_nonempty(errors);
                info!(%err, "rejected request");
                return Err(err);
            }
        };

        let mut rng = match self.seed.or(config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let response = crate::simulate(&circuit, shots, &mut rng);
        debug!(outcomes = response.results.len(), "simulation finished");
        Ok(response)
    }
}

fn aggregate_nonempty(errors: Vec<CircuitError>) -> CircuitError {
    CircuitError::aggregate(errors).unwrap_or(CircuitError::Invalid(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SimulationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let request = request("{}");

        assert_eq!(2, request.n_qubits);
        assert!(request.gates.is_empty());

        let circuit = request.to_circuit(&SimConfig::default()).unwrap();
        assert_eq!(2, circuit.num_of_qbits());
        assert_eq!(&[InitState::Zero; 2], circuit.init_states());
    }

    #[test]
    fn test_bell_request() {
        let request = request(
            r#"{
                "n_qubits": 2,
                "gates": [
                    { "type": "H", "target": 0, "time": 0 },
                    { "type": "CNOT", "control": 0, "target": 1, "time": 1 }
                ],
                "init_states": ["|0⟩", "|0⟩"],
                "shots": 2000,
                "seed": 5
            }"#,
        );

        let response = request.simulate(&SimConfig::default()).unwrap();

        assert_eq!("q0: ─H───@─\nq1: ─────X─", response.diagram);
        assert_eq!(2000, response.results.values().sum::<usize>());
        assert!(response.results.keys().all(|k| k == "00" || k == "11"));
    }

    #[test]
    fn test_invalid_symbol_names_gate() {
        let request = request(r#"{ "gates": [ { "type": "H", "target": 0 }, { "type": "RX", "target": 1 } ] }"#);

        let err = request.to_circuit(&SimConfig::default()).unwrap_err();

        assert_eq!(
            CircuitError::InvalidGateSymbol {
                gate: Some(1),
                symbol: "RX".to_string()
            },
            err
        );
    }

    #[test]
    fn test_all_problems_reported_together() {
        let request = request(
            r#"{
                "n_qubits": 2,
                "gates": [
                    { "type": "CNOT", "target": 1 },
                    { "type": "cnot", "control": 1, "target": 1, "time": 2 },
                    { "type": "X", "target": 7 }
                ],
                "init_states": ["|0⟩", "|2⟩"]
            }"#,
        );

        let err = request.simulate(&SimConfig::default()).unwrap_err();
        let CircuitError::Invalid(errors) = &err else {
            panic!("expected aggregated error, got {err:?}");
        };

        assert_eq!(4, errors.len());
        assert!(errors.contains(&CircuitError::MissingControl { gate: Some(0) }));
        assert!(errors.contains(&CircuitError::ControlEqualsTarget {
            gate: Some(1),
            qubit: 1
        }));
        assert!(errors.contains(&CircuitError::QubitIndexOutOfRange {
            gate: Some(2),
            qubit: 7,
            num_of_qbits: 2
        }));
        assert!(errors.contains(&CircuitError::InvalidInitState {
            qubit: 1,
            label: "|2⟩".to_string()
        }));
    }

    #[test]
    fn test_qubit_limit_from_config() {
        let request = SimulationRequest {
            n_qubits: 9,
            ..SimulationRequest::default()
        };

        assert_eq!(
            Err(CircuitError::QubitCountOutOfRange { got: 9, max: 8 }),
            request.to_circuit(&SimConfig::default()).map(|_| ())
        );

        let config = SimConfig {
            max_qubits: 10,
            ..SimConfig::default()
        };
        assert!(request.to_circuit(&config).is_ok());
    }

    #[test]
    fn test_init_state_count_mismatch() {
        let request = request(r#"{ "n_qubits": 3, "init_states": ["|1⟩", "|+⟩"] }"#);

        assert_eq!(
            Err(CircuitError::InitStateCountMismatch {
                expected: 3,
                got: 2
            }),
            request.to_circuit(&SimConfig::default()).map(|_| ())
        );
    }

    #[test]
    fn test_zero_shots_rejected() {
        let request = SimulationRequest {
            shots: Some(0),
            ..SimulationRequest::default()
        };

        assert_eq!(
            Err(CircuitError::InvalidShots),
            request.simulate(&SimConfig::default())
        );
    }

    #[test]
    fn test_overlap_rejected_at_boundary() {
        let request = request(
            r#"{ "gates": [ { "type": "H", "target": 0 }, { "type": "CNOT", "control": 1, "target": 0 } ] }"#,
        );

        assert_eq!(
            Err(CircuitError::OverlappingGatesAtTimeStep {
                first: 0,
                second: 1,
                qubit: 0,
                time: 0
            }),
            request.to_circuit(&SimConfig::default()).map(|_| ())
        );
    }

    #[test]
    fn test_time_step_past_limit_rejected() {
        let request = request(
            r#"{ "n_qubits": 1, "gates": [ { "type": "X", "target": 0, "time": 18446744073709551615 } ],
                 "shots": 10, "seed": 1 }"#,
        );

        assert_eq!(
            Err(CircuitError::TimeStepOutOfRange {
                gate: Some(0),
                time: usize::MAX,
                max: 64
            }),
            request.simulate(&SimConfig::default())
        );
    }

    #[test]
    fn test_time_step_limit_follows_config() {
        let request = request(
            r#"{ "n_qubits": 1, "gates": [ { "type": "X", "target": 0, "time": 4000000000000 },
                                         { "type": "H", "target": 0, "time": 100 } ] }"#,
        );

        let err = request.to_circuit(&SimConfig::default()).unwrap_err();
        let CircuitError::Invalid(errors) = err else {
            panic!("expected both gates rejected, got {err:?}");
        };
        assert_eq!(2, errors.len());

        let config = SimConfig {
            max_time_steps: 101,
            ..SimConfig::default()
        };
        assert_eq!(
            Err(CircuitError::TimeStepOutOfRange {
                gate: Some(0),
                time: 4_000_000_000_000,
                max: 101
            }),
            request.to_circuit(&config).map(|_| ())
        );
    }

    #[test]
    fn test_gate_on_crossed_wire_rejected() {
        let request = request(
            r#"{ "n_qubits": 3, "gates": [ { "type": "CNOT", "control": 0, "target": 2, "time": 1 },
                                         { "type": "Z", "target": 1, "time": 1 } ] }"#,
        );

        assert_eq!(
            Err(CircuitError::OverlappingGatesAtTimeStep {
                first: 0,
                second: 1,
                qubit: 1,
                time: 1
            }),
            request.to_circuit(&SimConfig::default()).map(|_| ())
        );
    }

    #[test]
    fn test_seeded_requests_are_reproducible() {
        let request = request(
            r#"{ "n_qubits": 3, "init_states": ["|+⟩", "|i⟩", "|−⟩"], "gates": [], "seed": 99 }"#,
        );
        let config = SimConfig::default();

        assert_eq!(request.simulate(&config), request.simulate(&config));
    }

    #[test]
    fn test_response_round_trips_through_json() {
        let response = SimulationResponse {
            diagram: "q0: ───".to_string(),
            results: Histogram::from([("0".to_string(), 3)]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(3, json["results"]["0"]);
        assert_eq!("q0: ───", json["diagram"]);
    }

    #[test]
    fn test_gate_spec_from_gate() {
        let spec = GateSpec::from(&Gate::CNot {
            control: 2,
            target: 0,
            time: 4,
        });
        assert_eq!("CNOT", spec.kind);
        assert_eq!(Some(2), spec.control);

        let request = SimulationRequest {
            n_qubits: 3,
            gates: vec![spec],
            ..SimulationRequest::default()
        };
        let circuit = request.to_circuit(&SimConfig::default()).unwrap();
        assert_eq!(4, circuit.max_time());
    }
}
