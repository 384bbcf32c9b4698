//! Population store with Pareto-dominance pruning.
//!
//! The working set of candidate solutions, keyed by their multi-objective
//! [`Evaluation`]. Keying by the full evaluation tuple means two
//! structurally different matrices with identical scores collapse to a
//! single stored entry, last write winning; the store makes no attempt
//! to distinguish them.
//!
//! Pruning removes every entry dominated by at least one other entry,
//! computed in a single pass against a pre-pruning snapshot of the key
//! set so the outcome never depends on removal order.

use std::collections::BTreeMap;
use std::fmt;

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::AssignmentMatrix;
use crate::objectives::Evaluation;

/// The candidate-solution store.
///
/// An ordered map so that iteration (and therefore sampling under a
/// fixed-seed RNG) is deterministic run to run.
#[derive(Debug, Clone, Default)]
pub struct Population {
    entries: BTreeMap<Evaluation, AssignmentMatrix>,
}

/// Aggregate progress snapshot over a population.
#[derive(Debug, Clone)]
pub struct PopulationSummary {
    /// Number of stored solutions.
    pub size: usize,
    /// Smallest summed score over all entries.
    pub min_total: u32,
    /// Mean summed score over all entries.
    pub avg_total: f64,
    /// The evaluation achieving `min_total`.
    pub best: Evaluation,
}

impl Population {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored solutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores a solution under its evaluation.
    ///
    /// An entry with an equal evaluation is overwritten: score-identical
    /// matrices are indistinguishable to the store.
    pub fn insert(&mut self, evaluation: Evaluation, matrix: AssignmentMatrix) {
        self.entries.insert(evaluation, matrix);
    }

    /// Iterates over stored (evaluation, matrix) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Evaluation, &AssignmentMatrix)> {
        self.entries.iter()
    }

    /// Draws `k` solutions uniformly at random, with replacement.
    ///
    /// Each pick is an independent deep copy, so agent mutation cannot
    /// touch the stored originals or the other picks.
    ///
    /// # Panics
    /// Panics if the store is empty. The seeding contract guarantees at
    /// least one solution before any sampling, so an empty store here is
    /// a programming error, not a runtime condition.
    pub fn sample<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<AssignmentMatrix> {
        assert!(!self.entries.is_empty(), "sampled an unseeded population");
        let values: Vec<&AssignmentMatrix> = self.entries.values().collect();
        (0..k)
            .map(|_| (*values.choose(rng).expect("non-empty")).clone())
            .collect()
    }

    /// Removes every entry dominated by at least one other entry.
    ///
    /// Dominance is judged against the pre-pruning snapshot of the whole
    /// key set, never against the shrinking survivor set.
    pub fn prune(&mut self) {
        let snapshot: Vec<Evaluation> = self.entries.keys().cloned().collect();
        self.entries
            .retain(|eval, _| !snapshot.iter().any(|other| other.dominates(eval)));
    }

    /// Progress snapshot: size plus min/mean aggregate score and the
    /// best entry's evaluation. `None` on an empty store.
    pub fn summary(&self) -> Option<PopulationSummary> {
        let best = self.entries.keys().min_by_key(|e| e.total())?;
        let sum: u64 = self.entries.keys().map(|e| u64::from(e.total())).sum();
        Some(PopulationSummary {
            size: self.entries.len(),
            min_total: best.total(),
            avg_total: sum as f64 / self.entries.len() as f64,
            best: best.clone(),
        })
    }
}

impl fmt::Display for PopulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} solutions, min score {}, avg score {:.2}, best: {}",
            self.size, self.min_total, self.avg_total, self.best
        )
    }
}
