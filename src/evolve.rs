//! The evolution loop.
//!
//! Drives the search: each iteration picks one registered agent
//! uniformly at random, applies it to fresh copies of sampled population
//! members, and inserts the results. Dominated solutions are pruned
//! periodically, progress snapshots are emitted periodically, and the
//! loop terminates on whichever of the iteration and wall-clock budgets
//! is exhausted first. Time-based termination exports the current store
//! before stopping; a final pruning pass always runs after the loop.
//!
//! Single-threaded by design: the store is mutated only here, and
//! agents work on deep copies, so one iteration is atomic relative to
//! the next.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::agents::{AgentKind, AgentRegistry};
use crate::io::export::{self, ExportError};
use crate::models::AssignmentMatrix;
use crate::objectives::{AssignmentProblem, ObjectiveSet};
use crate::population::Population;
use crate::profile::Profiler;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The wall-clock budget elapsed (results were exported).
    TimeExpired,
    /// The iteration budget ran out.
    IterationsExhausted,
}

/// Search failure. Agent and evaluation failures are fatal panics by
/// contract; the only recoverable-looking path is the final export, and
/// even that aborts the run.
#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("result export failed: {0}")]
    Export(#[from] ExportError),
}

/// Evolution budgets and reporting cadence.
#[derive(Debug, Clone)]
pub struct EvoConfig {
    /// Maximum number of agent invocations.
    pub max_iterations: u64,
    /// Prune dominated solutions every this many iterations.
    pub prune_interval: u64,
    /// Prune and emit a progress snapshot every this many iterations.
    pub status_interval: u64,
    /// Wall-clock budget.
    pub time_limit: Duration,
    /// Group identifier written to the first export column.
    pub group_name: String,
    /// Where to export results on time-based termination. `None`
    /// disables the export.
    pub results_path: Option<PathBuf>,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000_000,
            prune_interval: 100,
            status_interval: 1000,
            time_limit: Duration::from_secs(300),
            group_name: "ta-assign".to_string(),
            results_path: None,
        }
    }
}

impl EvoConfig {
    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the pruning cadence.
    pub fn with_prune_interval(mut self, interval: u64) -> Self {
        self.prune_interval = interval;
        self
    }

    /// Sets the progress-snapshot cadence.
    pub fn with_status_interval(mut self, interval: u64) -> Self {
        self.status_interval = interval;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the exported group identifier.
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }

    /// Sets the timeout export destination.
    pub fn with_results_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_path = Some(path.into());
        self
    }
}

/// Outcome of one [`Evolution::evolve`] run.
#[derive(Debug, Clone)]
pub struct EvolveReport {
    /// Why the loop stopped.
    pub termination: Termination,
    /// Agent invocations performed.
    pub iterations: u64,
    /// Wall time spent.
    pub elapsed: Duration,
    /// Store size after the final pruning pass.
    pub population_size: usize,
}

/// The search environment: problem data, objective and agent
/// registries, the population store, and the call profiler.
#[derive(Debug)]
pub struct Evolution {
    problem: AssignmentProblem,
    objectives: ObjectiveSet,
    agents: AgentRegistry,
    population: Population,
    profiler: Profiler,
}

impl Evolution {
    /// Creates an environment with the standard objectives and agents.
    pub fn new(problem: AssignmentProblem) -> Self {
        Self {
            problem,
            objectives: ObjectiveSet::standard(),
            agents: AgentRegistry::standard(),
            population: Population::new(),
            profiler: Profiler::new(),
        }
    }

    /// Replaces the objective registry.
    pub fn with_objectives(mut self, objectives: ObjectiveSet) -> Self {
        self.objectives = objectives;
        self
    }

    /// Replaces the agent registry.
    pub fn with_agents(mut self, agents: AgentRegistry) -> Self {
        self.agents = agents;
        self
    }

    /// The problem instance.
    pub fn problem(&self) -> &AssignmentProblem {
        &self.problem
    }

    /// The current population store.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Timing collected so far.
    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Evaluates and inserts an initial solution.
    ///
    /// At least one seed is required before [`Evolution::evolve`].
    pub fn seed(&mut self, matrix: AssignmentMatrix) {
        let evaluation = self.objectives.evaluate(&self.problem, &matrix);
        debug!(%evaluation, "seeded population");
        self.population.insert(evaluation, matrix);
    }

    /// Invokes one agent: sample, mutate fresh copies, insert results.
    fn run_agent<R: Rng>(&mut self, agent: AgentKind, rng: &mut R) {
        let picks = self.population.sample(agent.arity(), rng);
        for mut matrix in picks {
            let started = Instant::now();
            agent.apply(&self.problem, &mut matrix, rng);
            self.profiler.record(agent.name(), started.elapsed());

            let started = Instant::now();
            let evaluation = self.objectives.evaluate(&self.problem, &matrix);
            self.profiler.record("evaluate", started.elapsed());

            self.population.insert(evaluation, matrix);
        }
    }

    /// Runs the search until a budget is exhausted.
    ///
    /// # Panics
    /// Panics if the population was never seeded or the agent registry
    /// is empty — both are wiring errors, not runtime conditions.
    pub fn evolve<R: Rng>(
        &mut self,
        config: &EvoConfig,
        rng: &mut R,
    ) -> Result<EvolveReport, EvolveError> {
        assert!(!self.population.is_empty(), "evolve on an unseeded population");
        assert!(!self.agents.is_empty(), "evolve with no registered agents");
        assert!(config.prune_interval > 0 && config.status_interval > 0);

        let start = Instant::now();
        let mut iteration: u64 = 0;

        let termination = loop {
            if iteration >= config.max_iterations {
                break Termination::IterationsExhausted;
            }
            if start.elapsed() >= config.time_limit {
                info!(iteration, "wall-clock budget exhausted");
                if let Some(path) = &config.results_path {
                    export::write_results(
                        path,
                        &config.group_name,
                        &self.objectives,
                        &self.population,
                    )?;
                    info!(path = %path.display(), solutions = self.population.len(), "results exported");
                }
                break Termination::TimeExpired;
            }

            let agent = self.agents.choose(rng).expect("registry checked non-empty");
            self.run_agent(agent, rng);

            if iteration % config.prune_interval == 0 {
                self.population.prune();
            }
            if iteration % config.status_interval == 0 {
                self.population.prune();
                if let Some(summary) = self.population.summary() {
                    info!(
                        iteration,
                        size = summary.size,
                        min_score = summary.min_total,
                        avg_score = summary.avg_total,
                        best = %summary.best,
                        "progress"
                    );
                }
            }

            iteration += 1;
        };

        self.population.prune();
        Ok(EvolveReport {
            termination,
            iterations: iteration,
            elapsed: start.elapsed(),
            population_size: self.population.len(),
        })
    }
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

    fn seeded(problem: AssignmentProblem) -> Evolution {
        let mut evolution = Evolution::new(problem);
        let seed = AssignmentMatrix::ones(
            evolution.problem().num_tas(),
            evolution.problem().num_sections(),
        );
        evolution.seed(seed);
        evolution
    }

    #[test]
    fn test_iteration_bound_run() {
        let mut evolution = seeded(sample_problem());
        let config = EvoConfig::default()
            .with_max_iterations(200)
            .with_prune_interval(10)
            .with_status_interval(50)
            .with_time_limit(Duration::from_secs(600));
        let mut rng = SmallRng::seed_from_u64(42);

        let report = evolution.evolve(&config, &mut rng).unwrap();

        assert_eq!(report.termination, Termination::IterationsExhausted);
        assert_eq!(report.iterations, 200);
        assert!(report.population_size > 0);
        assert_eq!(report.population_size, evolution.population().len());
    }

    #[test]
    fn test_final_population_is_non_dominated() {
        let mut evolution = seeded(sample_problem());
        let config = EvoConfig::default()
            .with_max_iterations(300)
            .with_time_limit(Duration::from_secs(600));
        let mut rng = SmallRng::seed_from_u64(7);

        evolution.evolve(&config, &mut rng).unwrap();

        let evals: Vec<_> = evolution.population().iter().map(|(e, _)| e.clone()).collect();
        for p in &evals {
            for q in &evals {
                assert!(!p.dominates(q));
            }
        }
    }

    #[test]
    fn test_time_based_termination_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut evolution = seeded(sample_problem());
        let config = EvoConfig::default()
            .with_time_limit(Duration::ZERO)
            .with_group_name("jms")
            .with_results_path(&path);
        let mut rng = SmallRng::seed_from_u64(42);

        let report = evolution.evolve(&config, &mut rng).unwrap();

        assert_eq!(report.termination, Termination::TimeExpired);
        assert_eq!(report.iterations, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("groupname,overallocation,conflicts,undersupport,unwilling,unpreferred")
        );
        assert!(lines.next().unwrap().starts_with("jms,"));
    }

    #[test]
    fn test_iteration_based_termination_does_not_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut evolution = seeded(sample_problem());
        let config = EvoConfig::default()
            .with_max_iterations(5)
            .with_time_limit(Duration::from_secs(600))
            .with_results_path(&path);
        let mut rng = SmallRng::seed_from_u64(42);

        let report = evolution.evolve(&config, &mut rng).unwrap();

        assert_eq!(report.termination, Termination::IterationsExhausted);
        assert!(!path.exists());
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let run = |seed: u64| {
            let mut evolution = seeded(sample_problem());
            let config = EvoConfig::default()
                .with_max_iterations(150)
                .with_time_limit(Duration::from_secs(600));
            let mut rng = SmallRng::seed_from_u64(seed);
            evolution.evolve(&config, &mut rng).unwrap();
            let mut evals: Vec<_> = evolution
                .population()
                .iter()
                .map(|(e, _)| e.clone())
                .collect();
            evals.sort_by_key(|e| e.values().collect::<Vec<_>>());
            evals
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_profiler_records_agents_and_evaluations() {
        let mut evolution = seeded(sample_problem());
        let config = EvoConfig::default()
            .with_max_iterations(100)
            .with_time_limit(Duration::from_secs(600));
        let mut rng = SmallRng::seed_from_u64(42);

        evolution.evolve(&config, &mut rng).unwrap();

        let profiler = evolution.profiler();
        let eval_stats = profiler.stats("evaluate").unwrap();
        assert_eq!(eval_stats.calls, 100);

        let agent_calls: u64 = AgentRegistry::standard()
            .agents()
            .iter()
            .filter_map(|a| profiler.stats(a.name()))
            .map(|s| s.calls)
            .sum();
        assert_eq!(agent_calls, 100);
    }

    #[test]
    fn test_seeding_equal_scores_collapses() {
        let mut evolution = seeded(sample_problem());
        // Same matrix again: identical evaluation, single entry
        let seed = AssignmentMatrix::ones(4, 4);
        evolution.seed(seed);
        assert_eq!(evolution.population().len(), 1);
    }

    #[test]
    #[should_panic(expected = "unseeded")]
    fn test_evolve_unseeded_panics() {
        let mut evolution = Evolution::new(sample_problem());
        let mut rng = SmallRng::seed_from_u64(42);
        let _ = evolution.evolve(&EvoConfig::default(), &mut rng);
    }

    #[test]
    #[should_panic(expected = "no registered agents")]
    fn test_evolve_without_agents_panics() {
        let mut evolution =
            seeded(sample_problem()).with_agents(crate::agents::AgentRegistry::empty());
        let mut rng = SmallRng::seed_from_u64(42);
        let _ = evolution.evolve(&EvoConfig::default(), &mut rng);
    }
}
