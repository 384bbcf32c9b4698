//! Objective evaluation for assignment matrices.
//!
//! Five independent scalar costs, all lower-is-better with 0 meaning
//! fully satisfied. Each is deterministic, side-effect-free, and linear
//! in the matrix size.
//!
//! | Objective | Cost |
//! |-----------|------|
//! | overallocation | Σ per TA of assignments beyond their limit |
//! | conflicts | # of TAs with at least one same-slot double-booking |
//! | undersupport | Σ per section of missing TAs below the minimum |
//! | unwilling | # of assignments the TA marked unwilling |
//! | unpreferred | # of assignments the TA marked willing-but-not-preferred |
//!
//! [`ObjectiveSet`] is the ordered registry; its registration order fixes
//! the coordinate order of every [`Evaluation`] and the result-export
//! column order.

use std::collections::HashSet;
use std::fmt;

use crate::models::{AssignmentMatrix, Preference, Section, Ta};

/// The assignment problem instance: the loaded TA and section datasets.
///
/// Scoring methods index the matrix directly, so a matrix whose shape
/// disagrees with the datasets fails fast with an index panic.
#[derive(Debug, Clone)]
pub struct AssignmentProblem {
    tas: Vec<Ta>,
    sections: Vec<Section>,
}

impl AssignmentProblem {
    /// Creates a problem instance from loaded datasets.
    pub fn new(tas: Vec<Ta>, sections: Vec<Section>) -> Self {
        Self { tas, sections }
    }

    /// The TA dataset.
    pub fn tas(&self) -> &[Ta] {
        &self.tas
    }

    /// The section dataset.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Expected matrix row count.
    pub fn num_tas(&self) -> usize {
        self.tas.len()
    }

    /// Expected matrix column count.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Sum over TAs of assignments in excess of their limit.
    pub fn overallocation(&self, matrix: &AssignmentMatrix) -> u32 {
        self.tas
            .iter()
            .enumerate()
            .map(|(t, ta)| matrix.assigned_in_row(t).saturating_sub(ta.max_assigned))
            .sum()
    }

    /// Number of TAs with at least one same-slot double-booking.
    ///
    /// A TA counts once when their assigned-section count exceeds the
    /// number of distinct `daytime` slots among those sections, however
    /// many extra collisions they have.
    pub fn time_conflicts(&self, matrix: &AssignmentMatrix) -> u32 {
        let mut conflicted = 0;
        for t in 0..self.tas.len() {
            let mut assigned = 0u32;
            let mut slots: HashSet<&str> = HashSet::new();
            for (s, section) in self.sections.iter().enumerate() {
                if matrix.is_assigned(t, s) {
                    assigned += 1;
                    slots.insert(section.daytime.as_str());
                }
            }
            if assigned > slots.len() as u32 {
                conflicted += 1;
            }
        }
        conflicted
    }

    /// Sum over sections of missing TAs below the required minimum.
    pub fn undersupport(&self, matrix: &AssignmentMatrix) -> u32 {
        self.sections
            .iter()
            .enumerate()
            .map(|(s, section)| section.min_ta.saturating_sub(matrix.assigned_in_col(s)))
            .sum()
    }

    /// Number of assignments the TA marked unwilling.
    pub fn unwilling(&self, matrix: &AssignmentMatrix) -> u32 {
        self.count_assigned_with(matrix, Preference::Unwilling)
    }

    /// Number of assignments the TA marked willing but not preferred.
    pub fn unpreferred(&self, matrix: &AssignmentMatrix) -> u32 {
        self.count_assigned_with(matrix, Preference::Willing)
    }

    fn count_assigned_with(&self, matrix: &AssignmentMatrix, label: Preference) -> u32 {
        let mut count = 0;
        for (t, ta) in self.tas.iter().enumerate() {
            for s in 0..self.sections.len() {
                if matrix.is_assigned(t, s) && ta.preference_for(s) == label {
                    count += 1;
                }
            }
        }
        count
    }
}

/// One registered cost objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// TAs assigned beyond their stated maximum.
    Overallocation,
    /// TAs double-booked into a shared time slot.
    TimeConflict,
    /// Sections below their minimum TA count.
    Undersupport,
    /// Assignments against an unwilling label.
    Unwilling,
    /// Assignments against a willing-but-not-preferred label.
    Unpreferred,
}

impl Objective {
    /// Objective name, as used in evaluations and the export header.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::Overallocation => "overallocation",
            Objective::TimeConflict => "conflicts",
            Objective::Undersupport => "undersupport",
            Objective::Unwilling => "unwilling",
            Objective::Unpreferred => "unpreferred",
        }
    }

    /// Scores a matrix against this objective.
    pub fn score(&self, problem: &AssignmentProblem, matrix: &AssignmentMatrix) -> u32 {
        match self {
            Objective::Overallocation => problem.overallocation(matrix),
            Objective::TimeConflict => problem.time_conflicts(matrix),
            Objective::Undersupport => problem.undersupport(matrix),
            Objective::Unwilling => problem.unwilling(matrix),
            Objective::Unpreferred => problem.unpreferred(matrix),
        }
    }
}

/// Ordered objective registry.
///
/// Registration order is load-bearing: it fixes the coordinate order of
/// every [`Evaluation`] this set produces.
#[derive(Debug, Clone)]
pub struct ObjectiveSet {
    objectives: Vec<Objective>,
}

impl ObjectiveSet {
    /// The standard five objectives in export-header order.
    pub fn standard() -> Self {
        Self {
            objectives: vec![
                Objective::Overallocation,
                Objective::TimeConflict,
                Objective::Undersupport,
                Objective::Unwilling,
                Objective::Unpreferred,
            ],
        }
    }

    /// Registered objective names, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.objectives.iter().map(Objective::name).collect()
    }

    /// Number of registered objectives.
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Whether no objectives are registered.
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Scores a matrix against every registered objective, in order.
    pub fn evaluate(&self, problem: &AssignmentProblem, matrix: &AssignmentMatrix) -> Evaluation {
        Evaluation {
            scores: self
                .objectives
                .iter()
                .map(|obj| (obj.name(), obj.score(problem, matrix)))
                .collect(),
        }
    }
}

/// A matrix's multi-objective score: (name, cost) pairs in registration
/// order.
///
/// Totally ordered and hashable so it can key the population store —
/// two matrices with identical evaluations are indistinguishable to the
/// store. The ordering carries no optimization meaning; it only keeps
/// store iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Evaluation {
    scores: Vec<(&'static str, u32)>,
}

impl Evaluation {
    /// The (name, cost) pairs in registration order.
    pub fn scores(&self) -> &[(&'static str, u32)] {
        &self.scores
    }

    /// Cost coordinates without names, in registration order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.scores.iter().map(|&(_, v)| v)
    }

    /// Aggregate (summed) score, used for progress reporting.
    pub fn total(&self) -> u32 {
        self.values().sum()
    }

    /// Standard Pareto dominance, lower-is-better: no coordinate worse
    /// and at least one strictly better.
    pub fn dominates(&self, other: &Evaluation) -> bool {
        debug_assert_eq!(self.scores.len(), other.scores.len());
        let mut strictly_better = false;
        for (p, q) in self.values().zip(other.values()) {
            if p > q {
                return false;
            }
            if p < q {
                strictly_better = true;
            }
        }
        strictly_better
    }

    #[cfg(test)]
    pub(crate) fn from_values(values: &[u32]) -> Self {
        Self {
            scores: values.iter().map(|&v| ("obj", v)).collect(),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.scores {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
