//! zvssim - ZVS Mazzilli Driver Simulator
//!
//! Simulates a ZVS driver in the time domain and writes the steady-state
//! waveforms as `.dat` files.
//!
//! # Usage
//!
//! ```bash
//! zvssim driver.zvs --output-dir results
//! zvssim            # asks for each parameter
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use zvs_core::{
    dsl,
    error::Result,
    output::{prompt_parameters, write_parameters, DatFileSink},
    solver::{RetryPolicy, DEFAULT_MAX_ATTEMPTS},
    RetryController,
};

/// ZVS Mazzilli driver simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parameter file (.zvs); prompts for each value when omitted
    #[arg(value_name = "PARAMETER_FILE")]
    parameter_file: Option<PathBuf>,

    /// Directory receiving the .dat files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Maximum number of simulation attempts
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Do not print progress percentages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args = Args::parse();

    println!("ZVS Simulator Program.");

    // Collect the parameters
    let params = match &args.parameter_file {
        Some(path) => dsl::parse_file(path)?,
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            prompt_parameters(&mut input, &mut io::stdout())?
        }
    };
    info!("Parameters: {}", params);

    // Simulate, retrying on divergence
    let controller =
        RetryController::with_policy(RetryPolicy::new().with_max_attempts(args.max_attempts));
    let mut sink = DatFileSink::new(&args.output_dir).with_progress(!args.quiet);
    let outcome = controller.run(params, &mut sink)?;

    // Give-up is reported on the console only; parameters are written either way
    write_parameters(&args.output_dir, &outcome.parameters)?;

    Ok(())
}
