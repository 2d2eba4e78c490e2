use std::fmt::Display;

use anyhow::Result;
use nalgebra::{DVector, Matrix2};
use num_complex::Complex;

use crate::error::{CircuitError, CircuitResult};
use crate::gates::GateSymbol;
use crate::{Qbit, MAX_QUBITS};

/// Basis preparation applied to one qubit before the first gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InitState {
    #[default]
    Zero,
    One,
    Plus,
    Minus,
    PlusI,
    MinusI,
}

impl InitState {
    pub const ALL: [InitState; 6] = [
        InitState::Zero,
        InitState::One,
        InitState::Plus,
        InitState::Minus,
        InitState::PlusI,
        InitState::MinusI,
    ];

    /// Gates that take |0⟩ to this state, in application order.
    pub fn preparation(self) -> &'static [GateSymbol] {
        match self {
            InitState::Zero => &[],
            InitState::One => &[GateSymbol::X],
            InitState::Plus => &[GateSymbol::H],
            InitState::Minus => &[GateSymbol::X, GateSymbol::H],
            InitState::PlusI => &[GateSymbol::H, GateSymbol::S],
            InitState::MinusI => &[GateSymbol::H, GateSymbol::Z, GateSymbol::S],
        }
    }

    /// Parse a ket label. Accepts `|−i⟩`, `|-i>`, `-i` and the like.
    pub fn from_label(label: &str) -> Option<Self> {
        let inner = label
            .trim()
            .trim_start_matches('|')
            .trim_end_matches(['⟩', '>', '〉'])
            .replace('−', "-");

        match inner.as_str() {
            "0" => Some(InitState::Zero),
            "1" => Some(InitState::One),
            "+" => Some(InitState::Plus),
            "-" => Some(InitState::Minus),
            "i" | "+i" => Some(InitState::PlusI),
            "-i" => Some(InitState::MinusI),
            _ => None,
        }
    }
}

impl Display for InitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InitState::Zero => "|0⟩",
            InitState::One => "|1⟩",
            InitState::Plus => "|+⟩",
            InitState::Minus => "|−⟩",
            InitState::PlusI => "|i⟩",
            InitState::MinusI => "|−i⟩",
        };
        f.write_str(label)
    }
}

/// Dense state vector. Qubit 0 is the most significant bit of the index.
#[derive(Clone, Debug)]
pub struct QState {
    pub(crate) state: DVector<Qbit>,
}

impl QState {
    pub fn zero_state(num_of_qbits: usize) -> Self {
        let size = 1_usize << num_of_qbits;
        let mut state = DVector::zeros(size);
        state[0] = Complex::new(1.0, 0.0); // |0...0> state
        Self { state }
    }

    /// Basis state from a bit string such as `"01"`.
    pub fn from_bits(qbits: &str) -> Result<Self> {
        if qbits.is_empty() || qbits.len() > MAX_QUBITS {
            return Err(anyhow::anyhow!(
                "Bit string must have 1 to {MAX_QUBITS} bits, got {}",
                qbits.len()
            ));
        }
        let index = usize::from_str_radix(qbits, 2)?;
        let mut state = DVector::zeros(1_usize << qbits.len());
        state[index] = Complex::new(1.0, 0.0);

        Ok(Self { state })
    }

    /// |0...0⟩ followed by the preparation sequence of every label.
    ///
    /// Qubits occupy disjoint tensor factors, so the order across qubits
    /// does not matter.
    pub fn prepare(init_states: &[InitState]) -> Self {
        let mut qstate = Self::zero_state(init_states.len());
        for (qubit, init) in init_states.iter().enumerate() {
            for &symbol in init.preparation() {
                qstate.apply_gate_unchecked(symbol, qubit);
            }
        }
        qstate
    }

    pub fn num_of_qbits(&self) -> usize {
        self.state.len().ilog2() as usize
    }

    pub fn amplitudes(&self) -> &[Qbit] {
        self.state.as_slice()
    }

    /// Measurement probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes; 1 for a normalised state.
    pub fn norm_sqr(&self) -> f64 {
        self.state.iter().map(|amp| amp.norm_sqr()).sum()
    }

    fn check_and_reverse_index(&self, index: usize) -> CircuitResult<usize> {
        let num_of_qbits = self.num_of_qbits();
        if index >= num_of_qbits {
            return Err(CircuitError::QubitIndexOutOfRange {
                gate: None,
                qubit: index,
                num_of_qbits,
            });
        }
        Ok(num_of_qbits - 1 - index)
    }

    pub fn apply_gate(&mut self, symbol: GateSymbol, target: usize) -> CircuitResult<()> {
        self.check_and_reverse_index(target)?;
        self.apply_gate_unchecked(symbol, target);
        Ok(())
    }

    pub fn apply_cnot(&mut self, control: usize, target: usize) -> CircuitResult<()> {
        self.check_and_reverse_index(control)?;
        self.check_and_reverse_index(target)?;
        if control == target {
            return Err(CircuitError::ControlEqualsTarget {
                gate: None,
                qubit: control,
            });
        }
        self.apply_cnot_unchecked(control, target);
        Ok(())
    }

    pub(crate) fn apply_gate_unchecked(&mut self, symbol: GateSymbol, target: usize) {
        self.apply_matrix(&symbol.matrix(), target);
    }

    /// Every output amplitude is computed from the amplitudes before the
    /// update, never from a partially written buffer.
    fn apply_matrix(&mut self, gate: &Matrix2<Qbit>, target: usize) {
        let shift = self.num_of_qbits() - 1 - target;
        let mask = 1_usize << shift;

        let mut result: DVector<Qbit> = DVector::zeros(self.state.len());
        for i in (0..self.state.len()).filter(|i| i & mask == 0) {
            let partner = i | mask;
            let a0 = self.state[i];
            let a1 = self.state[partner];

            result[i] += gate[(0, 0)] * a0;
            result[partner] += gate[(1, 0)] * a0;
            result[i] += gate[(0, 1)] * a1;
            result[partner] += gate[(1, 1)] * a1;
        }

        self.state = result;
    }

    pub(crate) fn apply_cnot_unchecked(&mut self, control: usize, target: usize) {
        let num_of_qbits = self.num_of_qbits();
        let control_mask = 1_usize << (num_of_qbits - 1 - control);
        let target_mask = 1_usize << (num_of_qbits - 1 - target);

        let amplitudes = self.state.as_mut_slice();
        for i in 0..amplitudes.len() {
            if i & control_mask == 0 {
                continue;
            }
            let partner = i ^ target_mask;
            if i < partner {
                amplitudes.swap(i, partner);
            }
        }
    }
}

impl Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bin_width = self.num_of_qbits();

        for (i, value) in self.state.iter().enumerate() {
            writeln!(f, "|{:0width$b}>: {}", i, value, width = bin_width)?;
        }

        Ok(())
    }
}
