//! Text timing diagram: one line per qubit, one column per time step.
//!
//! ```text
//! q0: ─H───@─
//! q1: ─────┼─
//! q2: ─────X─
//! ```

use crate::circuit::Gate;
use crate::MAX_TIME_STEPS;

pub const WIRE: char = '─';
pub const CONTROL: char = '@';
pub const TARGET: char = 'X';
pub const CONNECTOR: char = '┼';

/// Render `gates` over `num_of_qbits` wires.
///
/// Gates are expected to be validated: no two share a cell, counting the
/// wires a CNOT crosses. Qubits out of range and time steps from
/// [`MAX_TIME_STEPS`] on are not drawn.
pub fn render(num_of_qbits: usize, gates: &[Gate]) -> String {
    let max_time = gates.iter().map(Gate::time).max().unwrap_or(0);
    let columns = max_time.saturating_add(1).min(MAX_TIME_STEPS);
    let mut grid = vec![vec![WIRE; columns]; num_of_qbits];

    // Connectors first so gate marks drawn afterwards win.
    for gate in gates {
        if let Gate::CNot {
            control,
            target,
            time,
        } = *gate
        {
            let (low, high) = (control.min(target), control.max(target));
            for qubit in (low..high.min(num_of_qbits)).skip(1) {
                put(&mut grid, qubit, time, CONNECTOR);
            }
        }
    }

    for gate in gates {
        match *gate {
            Gate::Single {
                symbol,
                target,
                time,
            } => put(&mut grid, target, time, symbol.as_char()),
            Gate::CNot {
                control,
                target,
                time,
            } => {
                put(&mut grid, control, time, CONTROL);
                put(&mut grid, target, time, TARGET);
            }
        }
    }

    let label_width = label(num_of_qbits.saturating_sub(1)).chars().count();
    grid.iter()
        .enumerate()
        .map(|(qubit, row)| {
            let cells = row
                .iter()
                .map(|&mark| format!("{WIRE}{mark}{WIRE}"))
                .collect::<Vec<_>>()
                .join(&WIRE.to_string());
            format!("{:>width$} {}", label(qubit), cells, width = label_width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn label(qubit: usize) -> String {
    format!("q{qubit}:")
}

fn put(grid: &mut [Vec<char>], qubit: usize, time: usize, mark: char) {
    if let Some(cell) = grid.get_mut(qubit).and_then(|row| row.get_mut(time)) {
        *cell = mark;
    }
}
