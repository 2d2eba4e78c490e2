use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, instrument};

use crate::qstate::QState;

/// Observed counts keyed by basis state, qubit 0 leftmost.
pub type Histogram = BTreeMap<String, usize>;

/// Draw `shots` measurements of every qubit from `qstate`.
///
/// Each draw selects the first basis state whose cumulative probability
/// exceeds it. Rounding can leave the total slightly below 1; draws falling
/// in that gap count towards the last basis state, so the counts always sum
/// to `shots`.
#[instrument(skip(qstate, rng), fields(num_of_qbits = qstate.num_of_qbits()))]
pub fn sample<R: Rng>(qstate: &QState, shots: usize, rng: &mut R) -> Histogram {
    let cumulative = qstate
        .probabilities()
        .into_iter()
        .scan(0.0, |total, p| {
            *total += p;
            Some(*total)
        })
        .collect::<Vec<f64>>();
    let last = cumulative.len() - 1;

    let mut counts = vec![0_usize; cumulative.len()];
    for _ in 0..shots {
        let r: f64 = rng.random();
        let index = cumulative.partition_point(|&c| c <= r).min(last);
        counts[index] += 1;
    }

    let width = qstate.num_of_qbits();
    let histogram = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(index, count)| (bitstring(index, width), count))
        .collect::<Histogram>();

    debug!(shots, outcomes = histogram.len(), "sampled");
    histogram
}

pub fn bitstring(index: usize, width: usize) -> String {
    format!("{:0width$b}", index, width = width)
}
