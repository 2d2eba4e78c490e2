//! Dense state-vector simulation of small timed circuits.
//!
//! A [`Circuit`] holds the qubit count, one basis preparation per qubit and
//! gates placed at logical time steps. Running it yields a [`QState`];
//! [`sampler::sample`] turns that into a shot histogram and
//! [`diagram::render`] draws the circuit as text.
//!
//! Qubit 0 is the most significant bit of a basis-state index, and the
//! leftmost character of a histogram key.

pub mod circuit;
pub mod config;
pub mod diagram;
pub mod error;
pub mod gates;
pub mod qstate;
pub mod request;
pub mod sampler;
#[doc(hidden)]
pub mod test_util;

use num_complex::Complex;
use rand::Rng;

pub use circuit::{Circuit, Gate};
pub use config::SimConfig;
pub use error::{CircuitError, CircuitResult};
pub use gates::GateSymbol;
pub use qstate::{InitState, QState};
pub use request::{GateSpec, SimulationRequest, SimulationResponse};
pub use sampler::Histogram;

pub type Qbit = Complex<f64>;

/// Hard ceiling on the qubit count; a 24-qubit state is 256 MiB.
pub const MAX_QUBITS: usize = 24;

/// Hard ceiling on the number of time steps; gate times run below it.
pub const MAX_TIME_STEPS: usize = 1024;

/// Run `circuit`, sample `shots` measurements and render its diagram.
pub fn simulate<R: Rng>(circuit: &Circuit, shots: usize, rng: &mut R) -> SimulationResponse {
    let qstate = circuit.run();
    SimulationResponse {
        diagram: diagram::render(circuit.num_of_qbits(), circuit.gates()),
        results: sampler::sample(&qstate, shots, rng),
    }
}
