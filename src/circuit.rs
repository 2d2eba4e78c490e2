use std::collections::HashMap;
use std::fmt::Display;
use std::ops::RangeInclusive;

use tracing::{debug, instrument};

use crate::diagram;
use crate::error::{CircuitError, CircuitResult};
use crate::gates::GateSymbol;
use crate::qstate::{InitState, QState};
use crate::{MAX_QUBITS, MAX_TIME_STEPS};

/// A gate placed at a logical time step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Single {
        symbol: GateSymbol,
        target: usize,
        time: usize,
    },
    CNot {
        control: usize,
        target: usize,
        time: usize,
    },
}

impl Gate {
    pub fn time(&self) -> usize {
        match *self {
            Gate::Single { time, .. } | Gate::CNot { time, .. } => time,
        }
    }

    /// Qubits the gate acts on, control first for CNOT.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Gate::Single { target, .. } => vec![target],
            Gate::CNot {
                control, target, ..
            } => vec![control, target],
        }
    }

    /// Qubits the gate claims in its time step: its own qubits plus, for a
    /// CNOT, every wire the connector crosses.
    pub fn span(&self) -> RangeInclusive<usize> {
        match *self {
            Gate::Single { target, .. } => target..=target,
            Gate::CNot {
                control, target, ..
            } => control.min(target)..=control.max(target),
        }
    }
}

/// Qubit count, initial preparations and timed gates.
///
/// A `Circuit` can only be built through validating constructors, so
/// [`Circuit::run`] never fails.
#[derive(Clone, Debug)]
pub struct Circuit {
    gates: Vec<Gate>,
    num_of_qbits: usize,
    init_states: Vec<InitState>,
    occupancy: Occupancy,
}

impl Circuit {
    /// Circuit with every qubit starting in |0⟩.
    pub fn new(num_of_qbits: usize) -> CircuitResult<Self> {
        check_num_of_qbits(num_of_qbits, MAX_QUBITS)?;
        Ok(Self::from_validated(
            Vec::new(),
            vec![InitState::Zero; num_of_qbits],
        ))
    }

    pub fn with_init_states(init_states: Vec<InitState>) -> CircuitResult<Self> {
        check_num_of_qbits(init_states.len(), MAX_QUBITS)?;
        Ok(Self::from_validated(Vec::new(), init_states))
    }

    /// Build a circuit from a full gate list, reporting every problem at once.
    pub fn from_parts(gates: Vec<Gate>, init_states: Vec<InitState>) -> CircuitResult<Self> {
        let mut errors = Vec::new();
        if let Err(err) = check_num_of_qbits(init_states.len(), MAX_QUBITS) {
            errors.push(err);
        }

        let indexed = gates.iter().copied().enumerate().collect::<Vec<_>>();
        errors.extend(validate_gates(init_states.len(), MAX_TIME_STEPS, &indexed));

        if let Some(err) = CircuitError::aggregate(errors) {
            return Err(err);
        }

        Ok(Self::from_validated(gates, init_states))
    }

    pub(crate) fn from_validated(gates: Vec<Gate>, init_states: Vec<InitState>) -> Self {
        let mut occupancy = Occupancy::default();
        for (index, gate) in gates.iter().enumerate() {
            occupancy.claim(index, gate);
        }
        Self {
            gates,
            num_of_qbits: init_states.len(),
            init_states,
            occupancy,
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn init_states(&self) -> &[InitState] {
        &self.init_states
    }

    pub fn set_init_state(&mut self, qubit: usize, init: InitState) -> CircuitResult<()> {
        let num_of_qbits = self.num_of_qbits;
        let slot = self
            .init_states
            .get_mut(qubit)
            .ok_or(CircuitError::QubitIndexOutOfRange {
                gate: None,
                qubit,
                num_of_qbits,
            })?;
        *slot = init;
        Ok(())
    }

    /// Append a gate after checking it against the circuit and the gates
    /// already placed.
    pub fn add_gate(&mut self, gate: Gate) -> CircuitResult<()> {
        let index = self.gates.len();
        let mut errors = check_gate(self.num_of_qbits, MAX_TIME_STEPS, index, &gate);
        if errors.is_empty() {
            errors = self.occupancy.collisions(index, &gate);
        }
        if let Some(err) = CircuitError::aggregate(errors) {
            return Err(err);
        }

        self.occupancy.claim(index, &gate);
        self.gates.push(gate);
        Ok(())
    }

    pub fn gate_at(mut self, symbol: GateSymbol, target: usize, time: usize) -> CircuitResult<Self> {
        self.add_gate(Gate::Single {
            symbol,
            target,
            time,
        })?;
        Ok(self)
    }

    pub fn cnot(mut self, control: usize, target: usize, time: usize) -> CircuitResult<Self> {
        self.add_gate(Gate::CNot {
            control,
            target,
            time,
        })?;
        Ok(self)
    }

    /// Gates in application order. The sort is stable, so gates sharing a
    /// time step keep their insertion order.
    pub fn schedule(&self) -> Vec<&Gate> {
        let mut ordered = self.gates.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|gate| gate.time());
        ordered
    }

    /// Latest time step used by any gate, 0 for an empty circuit.
    pub fn max_time(&self) -> usize {
        self.gates.iter().map(Gate::time).max().unwrap_or(0)
    }

    /// Prepare the initial state and apply every gate in time order.
    #[instrument(skip(self), fields(num_of_qbits = self.num_of_qbits, gates = self.gates.len()))]
    pub fn run(&self) -> QState {
        let mut qstate = QState::prepare(&self.init_states);

        for gate in self.schedule() {
            match *gate {
                Gate::Single { symbol, target, .. } => {
                    qstate.apply_gate_unchecked(symbol, target);
                }
                Gate::CNot {
                    control, target, ..
                } => {
                    qstate.apply_cnot_unchecked(control, target);
                }
            }
        }

        debug!(norm = qstate.norm_sqr(), "circuit applied");
        qstate
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", diagram::render(self.num_of_qbits, &self.gates))
    }
}

pub(crate) fn check_num_of_qbits(num_of_qbits: usize, max: usize) -> CircuitResult<()> {
    if num_of_qbits == 0 || num_of_qbits > max {
        return Err(CircuitError::QubitCountOutOfRange {
            got: num_of_qbits,
            max,
        });
    }
    Ok(())
}

/// Which gate holds each `(time, qubit)` cell.
#[derive(Clone, Debug, Default)]
struct Occupancy {
    cells: HashMap<(usize, usize), usize>,
}

impl Occupancy {
    fn collisions(&self, index: usize, gate: &Gate) -> Vec<CircuitError> {
        let time = gate.time();
        gate.span()
            .filter_map(|qubit| {
                self.cells.get(&(time, qubit)).map(|&first| {
                    CircuitError::OverlappingGatesAtTimeStep {
                        first,
                        second: index,
                        qubit,
                        time,
                    }
                })
            })
            .collect()
    }

    fn claim(&mut self, index: usize, gate: &Gate) {
        let time = gate.time();
        for qubit in gate.span() {
            self.cells.entry((time, qubit)).or_insert(index);
        }
    }
}

/// Checks on a gate by itself: qubit ranges, CNOT operands and time step.
fn check_gate(
    num_of_qbits: usize,
    max_time_steps: usize,
    index: usize,
    gate: &Gate,
) -> Vec<CircuitError> {
    let mut errors = gate
        .qubits()
        .into_iter()
        .filter(|&qubit| qubit >= num_of_qbits)
        .map(|qubit| CircuitError::QubitIndexOutOfRange {
            gate: Some(index),
            qubit,
            num_of_qbits,
        })
        .collect::<Vec<_>>();

    if let Gate::CNot {
        control, target, ..
    } = *gate
    {
        if control == target {
            errors.push(CircuitError::ControlEqualsTarget {
                gate: Some(index),
                qubit: control,
            });
        }
    }

    if gate.time() >= max_time_steps {
        errors.push(CircuitError::TimeStepOutOfRange {
            gate: Some(index),
            time: gate.time(),
            max: max_time_steps,
        });
    }

    errors
}

/// Check every gate by itself, then for time-step collisions among the gates
/// that pass.
///
/// Each gate is paired with its position in the caller's gate list so
/// errors point back at what the caller submitted.
pub(crate) fn validate_gates(
    num_of_qbits: usize,
    max_time_steps: usize,
    gates: &[(usize, Gate)],
) -> Vec<CircuitError> {
    let mut errors = Vec::new();
    let mut occupancy = Occupancy::default();

    for (index, gate) in gates {
        let problems = check_gate(num_of_qbits, max_time_steps, *index, gate);
        if !problems.is_empty() {
            errors.extend(problems);
            continue;
        }

        let collisions = occupancy.collisions(*index, gate);
        if collisions.is_empty() {
            occupancy.claim(*index, gate);
        } else {
            errors.extend(collisions);
        }
    }

    errors
}
