//! Randomized multi-user stress run.
//!
//! Builds a sheet, hammers it with the exerciser, prints the per-operation
//! report, and saves the final sheet as a snapshot.
//!
//! ```text
//! RUST_LOG=debug cargo run -p tessera-bench --example stress_sheet -- \
//!     --rows 100 --cols 200 --users 50 --tasks 10000 --out stress.snapshot
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tessera_bench::{Exerciser, ExerciserConfig};
use tessera_engine::{Sheet, SheetConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stress_sheet")]
#[command(about = "Drive a shared sheet from many threads and save the result")]
struct Args {
    /// Initial number of rows.
    #[arg(long, default_value_t = 100)]
    rows: usize,
    /// Initial number of columns.
    #[arg(long, default_value_t = 200)]
    cols: usize,
    /// Number of user threads (default: detected from available cores).
    #[arg(long)]
    users: Option<usize>,
    /// Number of tasks to submit.
    #[arg(long, default_value_t = 1_000)]
    tasks: usize,
    /// Seed for the task stream.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Where to save the final snapshot.
    #[arg(long, default_value = "stress_sheet.snapshot")]
    out: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = Sheet::new(SheetConfig::new(args.rows, args.cols))?;
    let exerciser = Exerciser::new(ExerciserConfig {
        users: args.users,
        tasks: args.tasks,
        seed: args.seed,
    });

    println!(
        "=== Tessera stress run: {} sheet, {} users ===\n",
        sheet.shape(),
        exerciser.config().resolved_user_count()
    );
    let report = exerciser.run(&sheet)?;
    print!("{report}");
    println!("\nfinal shape: {}", sheet.shape());

    let written = tessera_snapshot::save(&sheet, &args.out)?;
    println!("saved {written} cells to {}", args.out.display());
    Ok(())
}
