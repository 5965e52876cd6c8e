#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::uninlined_format_args)]

mod csv_reader;
mod ml;
mod structs;

use clap::{Parser, Subcommand};
use ml::output::{self, ANALYTICS_FAILURE};
use ml::profile::StudentProfile;
use std::path::{Path, PathBuf};
use structs::{AnalyticsReport, ApiResponse, CogError, Result, Source, StudentDataset};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "COGSCOPE_LOG";

/// Cogscope - student cognitive skills analytics
#[derive(Parser, Debug)]
#[command(name = "cogscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging (overridden by COGSCOPE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the analytics report for a student CSV
    Analyze {
        /// Student CSV to analyze; without it the fallback report is served
        #[arg(short, long)]
        csv: Option<PathBuf>,

        /// Also write report.json, summary.txt, clusters.csv, correlation.csv and stats.json here
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the fixed fallback report
    Mock {
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Write a synthetic student dataset as CSV
    Generate {
        /// Destination CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of students
        #[arg(short = 'n', long, default_value = "250")]
        count: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Show the profile and recommendations for one student
    Profile {
        /// Student CSV to search
        #[arg(short, long)]
        csv: PathBuf,

        /// Student identifier, e.g. STU0001
        #[arg(short, long)]
        student: String,

        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cogscope=debug" } else { "cogscope=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Some(Commands::Analyze {
            csv,
            output_dir,
            compact,
        }) => run_analyze(csv.as_deref(), output_dir.as_deref(), compact),

        Some(Commands::Mock { compact }) => {
            info!("serving fallback report");
            println!("{}", output::to_json(&output::mock_response(), compact)?);
            Ok(())
        }

        Some(Commands::Generate {
            output,
            count,
            seed,
        }) => run_generate(&output, count, seed),

        Some(Commands::Profile {
            csv,
            student,
            compact,
        }) => run_profile(&csv, &student, compact),

        None => Err(CogError::Config(
            "No subcommand provided. Run 'cogscope --help' for usage information.".into(),
        )),
    }
}

/// Run the analytics phase, printing the response envelope to stdout
fn run_analyze(csv_path: Option<&Path>, output_dir: Option<&Path>, compact: bool) -> Result<()> {
    let Some(csv_path) = csv_path else {
        info!("no dataset supplied, using mock analytics");
        println!("{}", output::to_json(&output::mock_response(), compact)?);
        return Ok(());
    };

    let dataset = match StudentDataset::from_file(csv_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            print_failure(&e.to_string(), compact)?;
            return Err(e);
        }
    };

    info!(
        records = dataset.record_count,
        "calculating analytics from {}",
        csv_path.display()
    );

    let result = match ml::pipeline::analyze(&dataset.students) {
        Ok(result) => result,
        Err(e) => {
            print_failure(ANALYTICS_FAILURE, compact)?;
            return Err(e);
        }
    };

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
        let response = output::uploaded_response(&dataset, result.report.clone());
        output::write_report(dir, &response)?;
        output::write_summary(dir, &output::build_summary(&dataset, &result))?;
        output::write_clusters(dir, &dataset, &result)?;
        output::write_correlation(dir, &result.correlation)?;
        output::write_stats_json(dir, &dataset, &result.column_stats)?;
        info!("output written to {}", dir.display());
    }

    let response = output::uploaded_response(&dataset, result.report);
    println!("{}", output::to_json(&response, compact)?);
    Ok(())
}

fn print_failure(message: &str, compact: bool) -> Result<()> {
    let failure: ApiResponse<AnalyticsReport> = ApiResponse::failure(message);
    println!("{}", output::to_json(&failure, compact)?);
    Ok(())
}

/// Write a seeded synthetic dataset
fn run_generate(output_path: &Path, count: usize, seed: u64) -> Result<()> {
    if count == 0 {
        return Err(CogError::Config("count must be at least 1".into()));
    }
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let students = ml::mock::generate_students(count, seed);
    csv_reader::write_students(output_path, &students)?;
    info!(count, seed, "generated dataset at {}", output_path.display());
    Ok(())
}

/// Print one student's profile envelope
fn run_profile(csv_path: &Path, student_id: &str, compact: bool) -> Result<()> {
    let dataset = StudentDataset::from_file(csv_path)?;

    let Some(record) = dataset.find(student_id) else {
        warn!(student_id, "student not found");
        return Err(CogError::Validation(format!(
            "Student not found: {student_id}"
        )));
    };

    let response = ApiResponse::ok(
        StudentProfile::build(record),
        Source::Uploaded,
        Some(dataset.record_count),
    );
    println!("{}", output::to_json(&response, compact)?);
    Ok(())
}
