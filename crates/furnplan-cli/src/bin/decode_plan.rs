//! Decode a shared plan and print its layout and stats.
//!
//! Usage:
//!   decode-plan <encoded-or-url> [--verbose] [--fallback <file>]

use furnplan_cli::{parse_decode_args, run_decode, CliError, EXIT_OK};
use furnplan_logic::catalog::Catalog;

fn run() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_decode_args(&args)?;
    let catalog = Catalog::builtin()?;
    let out = run_decode(&args, &catalog)?;
    if let Some(err) = &out.recovered_from {
        eprintln!("link did not decode ({}); showing the last good plan", err);
    }
    println!("{}", out.report);
    Ok(())
}

fn main() {
    furnplan_cli::init_logging();
    let code = match run() {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("decode-plan: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
