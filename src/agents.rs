//! Mutation agents: randomized local operators over assignment matrices.
//!
//! Each agent takes one sampled matrix and mutates it in place. The
//! evolution loop always hands agents a fresh deep copy of a population
//! member, so in-place mutation cannot corrupt the store.
//!
//! Agents encode repair or perturbation heuristics; an agent whose
//! target set is empty (nothing overallocated, nothing undersupported)
//! returns its input unchanged rather than erroring.
//!
//! [`AgentRegistry`] holds the active operator set. Activation is
//! explicit configuration: [`AgentRegistry::standard`] wires the four
//! operators used by the search, and the remaining variants opt in via
//! [`AgentRegistry::with_agent`].

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::{AssignmentMatrix, Preference};
use crate::objectives::AssignmentProblem;

/// How many random unwilling assignments [`AgentKind::DeleteRandomUnwilling`]
/// clears per invocation, and the count below which it is a no-op.
const UNWILLING_BATCH: usize = 5;

/// A named mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// For each TA over their limit, drop one random assignment of theirs.
    RepairOverallocated,
    /// For each section under its minimum, add one random unassigned TA.
    RepairUndersupported,
    /// Pick one random cell; if unassigned, assign it.
    ToggleRandomOn,
    /// Pick one random cell; if assigned, clear it.
    ToggleRandomOff,
    /// Clear one uniformly random assigned cell anywhere in the matrix.
    DeleteRandom,
    /// Assign one uniformly random unassigned cell anywhere in the matrix.
    AddRandom,
    /// Clear a batch of random unwilling assignments (no-op below the
    /// batch threshold).
    DeleteRandomUnwilling,
    /// Clear one random willing-but-not-preferred assignment.
    DeleteRandomUnpreferred,
}

impl AgentKind {
    /// Agent name for dispatch and profiling.
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::RepairOverallocated => "repair_overallocated",
            AgentKind::RepairUndersupported => "repair_undersupported",
            AgentKind::ToggleRandomOn => "toggle_random_on",
            AgentKind::ToggleRandomOff => "toggle_random_off",
            AgentKind::DeleteRandom => "delete_random",
            AgentKind::AddRandom => "add_random",
            AgentKind::DeleteRandomUnwilling => "delete_random_unwilling",
            AgentKind::DeleteRandomUnpreferred => "delete_random_unpreferred",
        }
    }

    /// Number of population samples this agent consumes per invocation.
    pub fn arity(&self) -> usize {
        1
    }

    /// Applies the operator to a matrix in place.
    ///
    /// Random selections are uniform over the eligible candidate set at
    /// selection time.
    pub fn apply<R: Rng>(
        &self,
        problem: &AssignmentProblem,
        matrix: &mut AssignmentMatrix,
        rng: &mut R,
    ) {
        match self {
            AgentKind::RepairOverallocated => repair_overallocated(problem, matrix, rng),
            AgentKind::RepairUndersupported => repair_undersupported(problem, matrix, rng),
            AgentKind::ToggleRandomOn => toggle_random(matrix, rng, true),
            AgentKind::ToggleRandomOff => toggle_random(matrix, rng, false),
            AgentKind::DeleteRandom => delete_random(matrix, rng),
            AgentKind::AddRandom => add_random(matrix, rng),
            AgentKind::DeleteRandomUnwilling => delete_random_unwilling(problem, matrix, rng),
            AgentKind::DeleteRandomUnpreferred => delete_random_unpreferred(problem, matrix, rng),
        }
    }
}

/// The set of agents the evolution loop draws from.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentKind>,
}

impl AgentRegistry {
    /// The four operators wired into the standard search: both repair
    /// heuristics plus the two single-cell toggles.
    pub fn standard() -> Self {
        Self {
            agents: vec![
                AgentKind::RepairOverallocated,
                AgentKind::RepairUndersupported,
                AgentKind::ToggleRandomOn,
                AgentKind::ToggleRandomOff,
            ],
        }
    }

    /// An empty registry, for fully explicit wiring.
    pub fn empty() -> Self {
        Self { agents: Vec::new() }
    }

    /// Activates an additional operator.
    pub fn with_agent(mut self, agent: AgentKind) -> Self {
        self.agents.push(agent);
        self
    }

    /// The active operators.
    pub fn agents(&self) -> &[AgentKind] {
        &self.agents
    }

    /// Whether no operators are active.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Picks one active operator uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<AgentKind> {
        self.agents.choose(rng).copied()
    }
}

fn repair_overallocated<R: Rng>(
    problem: &AssignmentProblem,
    matrix: &mut AssignmentMatrix,
    rng: &mut R,
) {
    // Rows are independent: unassigning within one TA's row never changes
    // another TA's overallocation status.
    for (t, ta) in problem.tas().iter().enumerate() {
        if matrix.assigned_in_row(t) > ta.max_assigned {
            if let Some(&s) = matrix.assigned_sections(t).choose(rng) {
                matrix.unassign(t, s);
            }
        }
    }
}

fn repair_undersupported<R: Rng>(
    problem: &AssignmentProblem,
    matrix: &mut AssignmentMatrix,
    rng: &mut R,
) {
    for (s, section) in problem.sections().iter().enumerate() {
        if matrix.assigned_in_col(s) < section.min_ta {
            if let Some(&t) = matrix.unassigned_tas(s).choose(rng) {
                matrix.assign(t, s);
            }
        }
    }
}

fn toggle_random<R: Rng>(matrix: &mut AssignmentMatrix, rng: &mut R, target: bool) {
    let t = rng.random_range(0..matrix.rows());
    let s = rng.random_range(0..matrix.cols());
    if matrix.is_assigned(t, s) != target {
        if target {
            matrix.assign(t, s);
        } else {
            matrix.unassign(t, s);
        }
    }
}

fn delete_random<R: Rng>(matrix: &mut AssignmentMatrix, rng: &mut R) {
    if let Some(&(t, s)) = matrix.assigned_cells().choose(rng) {
        matrix.unassign(t, s);
    }
}

fn add_random<R: Rng>(matrix: &mut AssignmentMatrix, rng: &mut R) {
    if let Some(&(t, s)) = matrix.unassigned_cells().choose(rng) {
        matrix.assign(t, s);
    }
}

fn delete_random_unwilling<R: Rng>(
    problem: &AssignmentProblem,
    matrix: &mut AssignmentMatrix,
    rng: &mut R,
) {
    let unwilling = assigned_with(problem, matrix, Preference::Unwilling);
    if unwilling.len() <= UNWILLING_BATCH {
        return;
    }
    // Picks are drawn with replacement, so a batch may clear fewer than
    // UNWILLING_BATCH distinct cells.
    for _ in 0..UNWILLING_BATCH {
        if let Some(&(t, s)) = unwilling.choose(rng) {
            matrix.unassign(t, s);
        }
    }
}

fn delete_random_unpreferred<R: Rng>(
    problem: &AssignmentProblem,
    matrix: &mut AssignmentMatrix,
    rng: &mut R,
) {
    if let Some(&(t, s)) = assigned_with(problem, matrix, Preference::Willing).choose(rng) {
        matrix.unassign(t, s);
    }
}

fn assigned_with(
    problem: &AssignmentProblem,
    matrix: &AssignmentMatrix,
    label: Preference,
) -> Vec<(usize, usize)> {
    matrix
        .assigned_cells()
        .into_iter()
        .filter(|&(t, s)| problem.tas()[t].preference_for(s) == label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Preference::{Preferred as P, Unwilling as U, Willing as W};
    use crate::models::{Section, Ta};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> AssignmentProblem {
        let sections = vec![
            Section::new("s0", "M 10", 1),
            Section::new("s1", "M 10", 1),
            Section::new("s2", "T 12", 2),
            Section::new("s3", "W 2", 1),
        ];
        let tas = vec![
            Ta::new("t0", 2).with_preferences(vec![P, W, U, P]),
            Ta::new("t1", 1).with_preferences(vec![W, U, P, W]),
            Ta::new("t2", 3).with_preferences(vec![U, P, P, U]),
            Ta::new("t3", 1).with_preferences(vec![P, P, W, W]),
        ];
        AssignmentProblem::new(tas, sections)
    }

    #[test]
    fn test_repair_overallocated_noop_when_within_limits() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let original = AssignmentMatrix::from_rows(vec![
            vec![true, true, false, false],
            vec![false, false, true, false],
            vec![true, false, true, false],
            vec![false, false, false, true],
        ]);
        let mut m = original.clone();
        AgentKind::RepairOverallocated.apply(&p, &mut m, &mut rng);
        assert_eq!(m, original);
    }

    #[test]
    fn test_repair_overallocated_drops_one_per_offender() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        // t1 and t3 (limit 1) hold 4 each; t0 (limit 2) holds 4; t2 (limit 3) holds 4
        let mut m = AssignmentMatrix::ones(4, 4);
        AgentKind::RepairOverallocated.apply(&p, &mut m, &mut rng);
        for t in 0..4 {
            assert_eq!(m.assigned_in_row(t), 3, "TA {t} should lose exactly one");
        }
    }

    #[test]
    fn test_repair_overallocated_respects_compliant_rows() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(7);
        // Only t1 (limit 1) is over; t2 (limit 3) holds exactly 3
        let mut m = AssignmentMatrix::from_rows(vec![
            vec![true, false, false, false],
            vec![true, true, false, false],
            vec![true, true, true, false],
            vec![false, false, false, false],
        ]);
        AgentKind::RepairOverallocated.apply(&p, &mut m, &mut rng);
        assert_eq!(m.assigned_in_row(0), 1);
        assert_eq!(m.assigned_in_row(1), 1);
        assert_eq!(m.assigned_in_row(2), 3);
    }

    #[test]
    fn test_repair_undersupported_noop_when_supported() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let original = AssignmentMatrix::ones(4, 4);
        let mut m = original.clone();
        AgentKind::RepairUndersupported.apply(&p, &mut m, &mut rng);
        assert_eq!(m, original);
    }

    #[test]
    fn test_repair_undersupported_fills_one_per_section() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        // Empty matrix: every section is short (mins 1, 1, 2, 1)
        let mut m = AssignmentMatrix::zeros(4, 4);
        AgentKind::RepairUndersupported.apply(&p, &mut m, &mut rng);
        for s in 0..4 {
            assert_eq!(m.assigned_in_col(s), 1, "section {s} should gain exactly one");
        }
    }

    #[test]
    fn test_toggle_random_on_full_matrix_unchanged() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let original = AssignmentMatrix::ones(4, 4);
        let mut m = original.clone();
        AgentKind::ToggleRandomOn.apply(&p, &mut m, &mut rng);
        assert_eq!(m, original);
    }

    #[test]
    fn test_toggle_random_on_adds_at_most_one() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut m = AssignmentMatrix::zeros(4, 4);
        AgentKind::ToggleRandomOn.apply(&p, &mut m, &mut rng);
        assert_eq!(m.assignment_count(), 1);
    }

    #[test]
    fn test_toggle_random_off_empty_matrix_unchanged() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let original = AssignmentMatrix::zeros(4, 4);
        let mut m = original.clone();
        AgentKind::ToggleRandomOff.apply(&p, &mut m, &mut rng);
        assert_eq!(m, original);
    }

    #[test]
    fn test_toggle_random_off_removes_at_most_one() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut m = AssignmentMatrix::ones(4, 4);
        AgentKind::ToggleRandomOff.apply(&p, &mut m, &mut rng);
        assert_eq!(m.assignment_count(), 15);
    }

    #[test]
    fn test_delete_and_add_random() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);

        let mut m = AssignmentMatrix::ones(4, 4);
        AgentKind::DeleteRandom.apply(&p, &mut m, &mut rng);
        assert_eq!(m.assignment_count(), 15);

        // Add on a full grid has no eligible cell
        let mut full = AssignmentMatrix::ones(4, 4);
        AgentKind::AddRandom.apply(&p, &mut full, &mut rng);
        assert_eq!(full.assignment_count(), 16);

        let mut empty = AssignmentMatrix::zeros(4, 4);
        AgentKind::DeleteRandom.apply(&p, &mut empty, &mut rng);
        assert_eq!(empty.assignment_count(), 0);
        AgentKind::AddRandom.apply(&p, &mut empty, &mut rng);
        assert_eq!(empty.assignment_count(), 1);
    }

    #[test]
    fn test_delete_random_unwilling_below_threshold_is_noop() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        // The full 4×4 grid holds exactly 4 unwilling assignments
        let original = AssignmentMatrix::ones(4, 4);
        let mut m = original.clone();
        AgentKind::DeleteRandomUnwilling.apply(&p, &mut m, &mut rng);
        assert_eq!(m, original);
    }

    #[test]
    fn test_delete_random_unwilling_clears_only_unwilling() {
        // 2 TAs, every label unwilling: the full grid holds 8 > 5
        let sections = vec![
            Section::new("s0", "M 10", 1),
            Section::new("s1", "T 12", 1),
            Section::new("s2", "W 2", 1),
            Section::new("s3", "F 4", 1),
        ];
        let tas = vec![
            Ta::new("t0", 4).with_preferences(vec![U, U, U, U]),
            Ta::new("t1", 4).with_preferences(vec![U, U, U, U]),
        ];
        let p = AssignmentProblem::new(tas, sections);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut m = AssignmentMatrix::ones(2, 4);
        AgentKind::DeleteRandomUnwilling.apply(&p, &mut m, &mut rng);

        let remaining = p.unwilling(&m);
        assert!(remaining < 8, "at least one cleared");
        // Five picks with replacement clear at most five distinct cells
        assert!(remaining >= 3, "at most five cleared, got {remaining}");
    }

    #[test]
    fn test_delete_random_unpreferred() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut m = AssignmentMatrix::ones(4, 4);
        let before = p.unpreferred(&m);
        AgentKind::DeleteRandomUnpreferred.apply(&p, &mut m, &mut rng);
        assert_eq!(p.unpreferred(&m), before - 1);

        // No willing assignment left anywhere: no-op
        let original = AssignmentMatrix::zeros(4, 4);
        let mut empty = original.clone();
        AgentKind::DeleteRandomUnpreferred.apply(&p, &mut empty, &mut rng);
        assert_eq!(empty, original);
    }

    #[test]
    fn test_standard_registry() {
        let registry = AgentRegistry::standard();
        assert_eq!(
            registry.agents(),
            &[
                AgentKind::RepairOverallocated,
                AgentKind::RepairUndersupported,
                AgentKind::ToggleRandomOn,
                AgentKind::ToggleRandomOff,
            ]
        );
        for agent in registry.agents() {
            assert_eq!(agent.arity(), 1);
        }
    }

    #[test]
    fn test_registry_explicit_activation() {
        let registry = AgentRegistry::standard().with_agent(AgentKind::DeleteRandomUnwilling);
        assert_eq!(registry.agents().len(), 5);
        assert!(registry.agents().contains(&AgentKind::DeleteRandomUnwilling));

        let mut rng = SmallRng::seed_from_u64(42);
        assert!(AgentRegistry::empty().choose(&mut rng).is_none());
        assert!(registry.choose(&mut rng).is_some());
    }
}
