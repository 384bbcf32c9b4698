//! Evolutionary TA-to-section assignment.
//!
//! Assigns teaching assistants to course sections by evolving a
//! population of candidate assignment matrices under five competing,
//! lower-is-better cost objectives: overallocation, time conflicts,
//! undersupport, unwillingness, and unpreference. The population keeps
//! only Pareto-non-dominated solutions; randomized local-mutation
//! agents drive the search until an iteration or wall-clock budget runs
//! out.
//!
//! # Modules
//!
//! - **`models`**: Domain types — [`models::Ta`], [`models::Section`],
//!   [`models::AssignmentMatrix`]
//! - **`objectives`**: The five cost functions and the ordered
//!   objective registry producing [`objectives::Evaluation`] tuples
//! - **`agents`**: Randomized repair/perturbation operators and their
//!   activation registry
//! - **`population`**: The evaluation-keyed solution store with
//!   Pareto-dominance pruning and with-replacement sampling
//! - **`evolve`**: The search loop, its budgets, and its termination
//!   states
//! - **`validation`**: Dataset integrity and matrix shape checks
//! - **`io`**: CSV dataset loading and result export
//! - **`profile`**: Call-level timing for the search loop
//!
//! # Search model
//!
//! No optimality guarantee: the engine is a stochastic local search
//! over the Pareto front, not an exact solver. Single-threaded by
//! design; reproducible when driven with a fixed-seed RNG.

pub mod agents;
pub mod evolve;
pub mod io;
pub mod models;
pub mod objectives;
pub mod population;
pub mod profile;
pub mod validation;
