use std::fmt;
use std::str::FromStr;

use nalgebra::Matrix2;
use num_complex::Complex;

use crate::error::CircuitError;
use crate::Qbit;

/// Symbols of the supported one-qubit gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateSymbol {
    X,
    Y,
    Z,
    H,
    S,
    T,
}

impl GateSymbol {
    pub const ALL: [GateSymbol; 6] = [
        GateSymbol::X,
        GateSymbol::Y,
        GateSymbol::Z,
        GateSymbol::H,
        GateSymbol::S,
        GateSymbol::T,
    ];

    pub fn as_char(self) -> char {
        match self {
            GateSymbol::X => 'X',
            GateSymbol::Y => 'Y',
            GateSymbol::Z => 'Z',
            GateSymbol::H => 'H',
            GateSymbol::S => 'S',
            GateSymbol::T => 'T',
        }
    }

    pub fn matrix(self) -> Matrix2<Qbit> {
        match self {
            GateSymbol::X => x_matrix(),
            GateSymbol::Y => y_matrix(),
            GateSymbol::Z => z_matrix(),
            GateSymbol::H => h_matrix(),
            GateSymbol::S => s_matrix(),
            GateSymbol::T => t_matrix(),
        }
    }
}

impl fmt::Display for GateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for GateSymbol {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(GateSymbol::X),
            "Y" => Ok(GateSymbol::Y),
            "Z" => Ok(GateSymbol::Z),
            "H" => Ok(GateSymbol::H),
            "S" => Ok(GateSymbol::S),
            "T" => Ok(GateSymbol::T),
            _ => Err(CircuitError::InvalidGateSymbol {
                gate: None,
                symbol: s.to_string(),
            }),
        }
    }
}

pub fn h_matrix() -> Matrix2<Qbit> {
    let root2 = 2.0_f64.sqrt();
    let one = Complex::new(1.0, 0.0);
    Matrix2::new(one / root2, one / root2, one / root2, -one / root2)
}

pub fn x_matrix() -> Matrix2<Qbit> {
    Matrix2::new(Complex::ZERO, Complex::ONE, Complex::ONE, Complex::ZERO)
}

pub fn y_matrix() -> Matrix2<Qbit> {
    Matrix2::new(
        Complex::ZERO,
        Complex::new(0.0, -1.0),
        Complex::new(0.0, 1.0),
        Complex::ZERO,
    )
}

pub fn z_matrix() -> Matrix2<Qbit> {
    Matrix2::new(
        Complex::ONE,
        Complex::ZERO,
        Complex::ZERO,
        Complex::new(-1.0, 0.0),
    )
}

pub fn s_matrix() -> Matrix2<Qbit> {
    Matrix2::new(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::I)
}

pub fn t_matrix() -> Matrix2<Qbit> {
    Matrix2::new(
        Complex::ONE,
        Complex::ZERO,
        Complex::ZERO,
        Complex::from_polar(1.0, std::f64::consts::FRAC_PI_4),
    )
}
