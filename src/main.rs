//! TA assignment CLI.
//!
//! Loads the TA and section datasets, then either runs the evolutionary
//! search (`run`) or scores a fixture matrix (`score`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ta_assign::evolve::{EvoConfig, Evolution, Termination};
use ta_assign::io::{load_matrix, load_sections, load_tas};
use ta_assign::models::AssignmentMatrix;
use ta_assign::objectives::{AssignmentProblem, ObjectiveSet};
use ta_assign::validation;

#[derive(Parser)]
#[command(name = "ta-assign")]
#[command(about = "Evolutionary TA-to-section assignment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TA dataset CSV
    #[arg(long, default_value = "tas.csv")]
    tas: PathBuf,

    /// Section dataset CSV
    #[arg(long, default_value = "sections.csv")]
    sections: PathBuf,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the evolutionary search.
    Run {
        /// Iteration budget
        #[arg(short = 'n', long, default_value = "10000000")]
        iterations: u64,

        /// Wall-clock budget in seconds
        #[arg(short, long, default_value = "300")]
        time_limit: u64,

        /// Prune dominated solutions every N iterations
        #[arg(long, default_value = "100")]
        prune_interval: u64,

        /// Prune and report progress every N iterations
        #[arg(long, default_value = "1000")]
        status_interval: u64,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Group identifier written to the results file
        #[arg(short, long, default_value = "ta-assign")]
        group: String,

        /// Results file, written on time-based termination
        #[arg(short, long, default_value = "results.csv")]
        output: PathBuf,
    },

    /// Score a fixture assignment matrix against the datasets.
    Score {
        /// Headerless 0/1 matrix CSV, one row per TA
        matrix: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tas = load_tas(&cli.tas).with_context(|| format!("loading {}", cli.tas.display()))?;
    let sections = load_sections(&cli.sections)
        .with_context(|| format!("loading {}", cli.sections.display()))?;

    if let Err(errors) = validation::validate_input(&tas, &sections) {
        for error in &errors {
            eprintln!("{:?}: {}", error.kind, error.message);
        }
        bail!("invalid datasets ({} problems)", errors.len());
    }
    info!(tas = tas.len(), sections = sections.len(), "datasets loaded");

    let problem = AssignmentProblem::new(tas, sections);

    match cli.command {
        Commands::Run {
            iterations,
            time_limit,
            prune_interval,
            status_interval,
            seed,
            group,
            output,
        } => {
            let config = EvoConfig::default()
                .with_max_iterations(iterations)
                .with_time_limit(Duration::from_secs(time_limit))
                .with_prune_interval(prune_interval)
                .with_status_interval(status_interval)
                .with_group_name(group)
                .with_results_path(output);

            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };

            let mut evolution = Evolution::new(problem);
            let rows = evolution.problem().num_tas();
            let cols = evolution.problem().num_sections();
            evolution.seed(AssignmentMatrix::ones(rows, cols));

            info!(
                iterations = config.max_iterations,
                time_limit_s = config.time_limit.as_secs(),
                seed = ?seed,
                "starting search"
            );
            let report = evolution.evolve(&config, &mut rng)?;

            println!("\n=== Search Complete ===");
            println!("Termination: {:?}", report.termination);
            println!("Iterations: {}", report.iterations);
            println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
            println!("Solutions: {}", report.population_size);
            if let Some(summary) = evolution.population().summary() {
                println!("Min score: {}", summary.min_total);
                println!("Average score: {:.2}", summary.avg_total);
                println!("Best: {}", summary.best);
            }
            if report.termination == Termination::IterationsExhausted {
                println!("Iteration budget exhausted before the time limit; no results file written.");
            }

            println!("\n{}", evolution.profiler());
        }

        Commands::Score { matrix } => {
            let fixture =
                load_matrix(&matrix).with_context(|| format!("loading {}", matrix.display()))?;
            validation::check_matrix_shape(&fixture, problem.tas(), problem.sections())?;

            let evaluation = ObjectiveSet::standard().evaluate(&problem, &fixture);
            for (name, value) in evaluation.scores() {
                println!("{name}: {value}");
            }
        }
    }

    Ok(())
}
