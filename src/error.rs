//! Error types for circuit validation.

use thiserror::Error;

/// Problems found while turning a circuit description into a [`crate::Circuit`].
///
/// `gate` fields hold the position of the offending gate in the submitted
/// gate list, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// Gate type is not one of X, Y, Z, H, S, T or CNOT.
    #[error("unknown gate symbol '{symbol}'{}", format_gate_context(.gate))]
    InvalidGateSymbol {
        gate: Option<usize>,
        symbol: String,
    },

    /// A gate names a qubit the circuit does not have.
    #[error("qubit {qubit} is out of range for {num_of_qbits} qubits{}", format_gate_context(.gate))]
    QubitIndexOutOfRange {
        gate: Option<usize>,
        qubit: usize,
        num_of_qbits: usize,
    },

    /// CNOT whose control and target coincide.
    #[error("control and target qubits cannot be the same (qubit {qubit}){}", format_gate_context(.gate))]
    ControlEqualsTarget { gate: Option<usize>, qubit: usize },

    /// CNOT submitted without a control qubit.
    #[error("CNOT requires a control qubit{}", format_gate_context(.gate))]
    MissingControl { gate: Option<usize> },

    /// Gate time step past the configured number of steps.
    #[error("time step {time} is out of range, must be below {max}{}", format_gate_context(.gate))]
    TimeStepOutOfRange {
        gate: Option<usize>,
        time: usize,
        max: usize,
    },

    /// Two gates claim the same qubit in the same time step. A CNOT claims
    /// every qubit from its control to its target.
    #[error("gates {first} and {second} overlap on qubit {qubit} at time {time}")]
    OverlappingGatesAtTimeStep {
        first: usize,
        second: usize,
        qubit: usize,
        time: usize,
    },

    /// Initial state label is not one of the six basis preparations.
    #[error("unknown initial state '{label}' for qubit {qubit}")]
    InvalidInitState { qubit: usize, label: String },

    #[error("expected {expected} initial states, got {got}")]
    InitStateCountMismatch { expected: usize, got: usize },

    #[error("number of qubits must be between 1 and {max}, got {got}")]
    QubitCountOutOfRange { got: usize, max: usize },

    #[error("shot count must be at least 1")]
    InvalidShots,

    /// Several problems found in one pass.
    #[error("circuit is invalid: {}", format_all(.0))]
    Invalid(Vec<CircuitError>),
}

impl CircuitError {
    /// Collapse a list of problems into a single error.
    ///
    /// Returns `None` when the list is empty.
    pub fn aggregate(mut errors: Vec<CircuitError>) -> Option<CircuitError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(CircuitError::Invalid(errors)),
        }
    }

    pub(crate) fn with_gate(self, index: usize) -> Self {
        match self {
            CircuitError::InvalidGateSymbol { symbol, .. } => CircuitError::InvalidGateSymbol {
                gate: Some(index),
                symbol,
            },
            other => other,
        }
    }
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate: &Option<usize>) -> String {
    match gate {
        Some(index) => format!(" (gate #{index})"),
        None => String::new(),
    }
}

fn format_all(errors: &[CircuitError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for circuit construction.
pub type CircuitResult<T> = Result<T, CircuitError>;
