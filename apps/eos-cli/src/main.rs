//! eos-cli: evaluate, fit and invert equations of state from job files.

mod error;
mod job;

use clap::{Parser, Subcommand};
use eos_core::{Dimension, EosScalar, Quantity, Unit, UnitTable};
use eos_models::{Property, evaluate_many};
use eos_solver::{FitOutcome, find_volumes, fit, linear_fit};
use error::{AppError, AppResult};
use job::Job;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "eos-cli")]
#[command(about = "Equation-of-state evaluation and fitting", long_about = None)]
struct Cli {
    /// Log solver progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the job's property at each of its volumes
    Eval {
        /// Path to job file (YAML or JSON)
        job: PathBuf,
    },
    /// Fit the job's trial record to its observations
    Fit {
        /// Path to job file (YAML or JSON)
        job: PathBuf,
        /// Print the raw solver trace instead of the fitted record
        #[arg(long)]
        debug: bool,
    },
    /// Find the volume at which the property reaches each target
    Find {
        /// Path to job file (YAML or JSON)
        job: PathBuf,
    },
    /// Fit energies with a polynomial in finite strain
    Linfit {
        /// Path to job file (YAML or JSON)
        job: PathBuf,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let table = UnitTable::standard();
    match cli.command {
        Commands::Eval { job } => cmd_eval(&job, &table),
        Commands::Fit { job, debug } => cmd_fit(&job, debug, &table),
        Commands::Find { job } => cmd_find(&job, &table),
        Commands::Linfit { job } => cmd_linfit(&job, &table),
    }
}

fn load(path: &Path) -> AppResult<Job> {
    info!(path = %path.display(), "loading job");
    Job::load(path)
}

fn cmd_eval(path: &Path, table: &UnitTable) -> AppResult<()> {
    let job = load(path)?;
    let eos = job.equation_of_state(table)?;
    let volumes = job.volumes(table)?;
    if volumes.is_empty() {
        return Err(AppError::InvalidInput("eval needs `volumes`".to_string()));
    }
    let values = evaluate_many(job.property, &eos, &volumes)?;

    println!("{eos}");
    println!("{:>20}  {}", "volume", job.property);
    for (v, value) in volumes.iter().zip(&values) {
        println!("{:>20}  {value}", v.to_string());
    }
    Ok(())
}

fn cmd_fit(path: &Path, debug: bool, table: &UnitTable) -> AppResult<()> {
    let mut job = load(path)?;
    job.fit.debug |= debug;
    let trial = job.equation_of_state(table)?;
    let volumes = job.volumes(table)?;
    let observed = job.observed(table)?;

    match fit(job.property, &trial, &volumes, &observed, &job.fit)? {
        FitOutcome::Fitted(eos) => {
            println!("✓ Fitted {} to {} points", eos.family(), volumes.len());
            for (name, value) in eos.field_names().iter().zip(eos.to_vector()) {
                println!("  {name:>8} = {value}");
            }
        }
        FitOutcome::Trace(trace) => {
            let status = if trace.converged { "converged" } else { "not converged" };
            println!("Solver trace ({status}, {} iterations)", trace.iterations);
            println!("  residual norm = {:e}", trace.residual_norm);
            let errors = trace.standard_errors();
            for (i, name) in trial.field_names().iter().enumerate() {
                match errors.as_ref().and_then(|e| e.get(i)) {
                    Some(err) => println!("  {name:>8} = {} ± {err:e}", trace.x[i]),
                    None => println!("  {name:>8} = {}", trace.x[i]),
                }
            }
            println!("  (canonical units: Å³, eV, eV/Å³)");
        }
    }
    Ok(())
}

fn cmd_find(path: &Path, table: &UnitTable) -> AppResult<()> {
    let job = load(path)?;
    let eos = job.equation_of_state(table)?;
    let targets = job.targets(table)?;
    if targets.is_empty() {
        return Err(AppError::InvalidInput("find needs `targets`".to_string()));
    }
    let seed = job.seed(eos.v0(), table)?;
    let volumes = find_volumes(job.property, &eos, &targets, seed, job.method)?;

    println!("{eos}");
    println!("{:>20}  volume", job.property.to_string());
    for (target, v) in targets.iter().zip(&volumes) {
        println!("{:>20}  {v}", target.to_string());
    }
    Ok(())
}

fn cmd_linfit(path: &Path, table: &UnitTable) -> AppResult<()> {
    let job = load(path)?;
    if job.property != Property::Energy {
        return Err(AppError::InvalidInput(
            "linfit fits energies; set `property: energy`".to_string(),
        ));
    }
    let volumes = canonical(&job.volumes(table)?, Dimension::VOLUME)?;
    let energies = canonical(&job.observed(table)?, Dimension::ENERGY)?;
    let result = linear_fit(&volumes, &energies, &job.linear)?;
    let b0 = Quantity::new(result.b0, Unit::ev_per_cubic_angstrom()).convert(Unit::gigapascal())?;

    println!(
        "✓ Degree {} fit in {} strain (reference volume {} Å³)",
        job.linear.degree, result.strain, result.reference_volume
    );
    println!("  v0   = {} Å³", result.v0);
    println!("  e0   = {} eV", result.e0);
    println!("  b0   = {} eV/Å³ ({b0})", result.b0);
    println!("  bp0  = {}", result.bp0);
    println!("  bpp0 = {} Å³/eV", result.bpp0);
    println!("  residual norm = {:e}", result.residual_norm);
    Ok(())
}

fn canonical(values: &[Quantity], dimension: Dimension) -> AppResult<Vec<f64>> {
    values
        .iter()
        .map(|q| EosScalar::to_canonical(q, dimension).map_err(AppError::from))
        .collect()
}
