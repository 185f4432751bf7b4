//! Decode a plan, fill it with furniture, and print the new encoding.
//!
//! Usage:
//!   run-optimizer <encoded-or-url> [--decode] [--clear] [--config <file>]
//!
//! The encoded plan goes to stdout; diagnostics go to stderr.

use furnplan_cli::{load_config, parse_optimize_args, run_optimize, CliError, EXIT_OK};
use furnplan_logic::catalog::Catalog;

fn run() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_optimize_args(&args)?;
    let config = load_config(args.config.as_deref())?;
    let catalog = Catalog::builtin()?;
    let out = run_optimize(&args, &catalog, &config)?;
    for line in &out.diagnostics {
        eprintln!("{}", line);
    }
    if let Some(report) = &out.report {
        eprintln!("{}", report);
    }
    println!("{}", out.encoded);
    Ok(())
}

fn main() {
    furnplan_cli::init_logging();
    let code = match run() {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("run-optimizer: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
