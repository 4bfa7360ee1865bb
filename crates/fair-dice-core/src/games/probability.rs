//! Win probabilities between dice.

use super::{Die, DieSet};

/// Probability that a roll of `a` is strictly greater than a roll of `b`
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    let wins = a
        .faces()
        .iter()
        .map(|x| b.faces().iter().filter(|y| x > y).count())
        .sum::<usize>();
    let total = a.faces().len() * b.faces().len();
    wins as f64 / total as f64
}

/// Pairwise win probabilities for a die set.
///
/// Entry `(row, col)` is the chance that die `row` beats die `col`; the
/// diagonal is left empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
    cells: Vec<Vec<Option<f64>>>,
}

impl ProbabilityTable {
    pub fn compute(dice: &DieSet) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(row, a)| {
                dice.iter()
                    .enumerate()
                    .map(|(col, b)| (row != col).then(|| win_probability(a, b)))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }
}
