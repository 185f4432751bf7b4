//! Shared plumbing for the FurnPlan command-line tools.
//!
//! Both binaries parse `std::env::args` by hand, write results to stdout and
//! diagnostics to stderr, and exit with one of the codes below.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | usage error |
//! | 2 | plan could not be decoded (or re-encoded) |
//! | 3 | building id not in the catalog |
//! | 4 | furniture definition missing or unreadable |
//! | 5 | invalid configuration |

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use furnplan_logic::catalog::Catalog;
use furnplan_logic::codec::{self, EncodeMode, WireFormat};
use furnplan_logic::config::PlannerConfig;
use furnplan_logic::error::{DecodeError, PlannerError};
use furnplan_logic::optimizer::{optimize, OptimizeOptions};
use furnplan_logic::plan::Plan;
use furnplan_logic::render::render_report;
use furnplan_logic::storage::{restore_plan, FileStore, Restored};

pub const EXIT_OK: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_DECODE: i32 = 2;
pub const EXIT_UNKNOWN_BUILDING: i32 = 3;
pub const EXIT_MISSING_FURNITURE: i32 = 4;
pub const EXIT_CONFIG: i32 = 5;

/// Environment variable naming a default config file.
pub const CONFIG_ENV: &str = "FURNPLAN_CONFIG";

pub const DECODE_USAGE: &str = "usage: decode-plan <encoded-or-url> [--verbose] [--fallback <file>]";
pub const OPTIMIZE_USAGE: &str =
    "usage: run-optimizer <encoded-or-url> [--decode] [--clear] [--config <file>]";

/// Install the stderr logger. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Planner(PlannerError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            CliError::Planner(e) => match e {
                PlannerError::Decode(_) | PlannerError::Encode(_) => EXIT_DECODE,
                PlannerError::UnknownBuilding(_) => EXIT_UNKNOWN_BUILDING,
                PlannerError::MissingFurniture { .. } | PlannerError::Schema(_) => {
                    EXIT_MISSING_FURNITURE
                }
                PlannerError::Config(_) => EXIT_CONFIG,
            },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Planner(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<PlannerError> for CliError {
    fn from(e: PlannerError) -> Self {
        CliError::Planner(e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        CliError::Planner(PlannerError::Decode(e))
    }
}

// ── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeArgs {
    pub input: String,
    pub verbose: bool,
    pub fallback: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeArgs {
    pub input: String,
    pub decode: bool,
    pub clear: bool,
    pub config: Option<PathBuf>,
}

fn usage(usage: &str, problem: String) -> CliError {
    CliError::Usage(format!("{}\n{}", problem, usage))
}

/// Parse `decode-plan` arguments (program name already stripped).
pub fn parse_decode_args(args: &[String]) -> Result<DecodeArgs, CliError> {
    let mut input = None;
    let mut verbose = false;
    let mut fallback = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--fallback" => {
                let path = iter
                    .next()
                    .ok_or_else(|| usage(DECODE_USAGE, "--fallback needs a file".into()))?;
                fallback = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => {
                return Err(usage(DECODE_USAGE, format!("unknown option {}", flag)))
            }
            value if input.is_none() => input = Some(value.to_string()),
            value => return Err(usage(DECODE_USAGE, format!("unexpected argument {}", value))),
        }
    }
    let input = input.ok_or_else(|| usage(DECODE_USAGE, "missing plan".into()))?;
    Ok(DecodeArgs {
        input,
        verbose,
        fallback,
    })
}

/// Parse `run-optimizer` arguments (program name already stripped).
pub fn parse_optimize_args(args: &[String]) -> Result<OptimizeArgs, CliError> {
    let mut input = None;
    let mut decode = false;
    let mut clear = false;
    let mut config = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--decode" => decode = true,
            "--clear" => clear = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| usage(OPTIMIZE_USAGE, "--config needs a file".into()))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => {
                return Err(usage(OPTIMIZE_USAGE, format!("unknown option {}", flag)))
            }
            value if input.is_none() => input = Some(value.to_string()),
            value => {
                return Err(usage(OPTIMIZE_USAGE, format!("unexpected argument {}", value)))
            }
        }
    }
    let input = input.ok_or_else(|| usage(OPTIMIZE_USAGE, "missing plan".into()))?;
    Ok(OptimizeArgs {
        input,
        decode,
        clear,
        config,
    })
}

// ── Config ──────────────────────────────────────────────────────────────

/// Load configuration from `path`, else from the file named by
/// `FURNPLAN_CONFIG`, else defaults. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig, PlannerError> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let Some(path) = path.map(Path::to_path_buf).or(from_env) else {
        return Ok(PlannerConfig::default());
    };
    let json = fs::read_to_string(&path)
        .map_err(|e| PlannerError::Config(format!("{}: {}", path.display(), e)))?;
    log::info!("using config {}", path.display());
    PlannerConfig::from_json_validated(&json)
}

// ── Commands ────────────────────────────────────────────────────────────

/// What `decode-plan` prints.
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    pub report: String,
    pub format: Option<WireFormat>,
    /// Set when the fallback store supplied the plan.
    pub recovered_from: Option<DecodeError>,
}

fn decode_input(args: &DecodeArgs) -> Result<(Plan, Option<WireFormat>, Option<DecodeError>), CliError> {
    match &args.fallback {
        None => {
            let (plan, format) = codec::decode_with_format(&args.input)?;
            Ok((plan, Some(format), None))
        }
        Some(path) => {
            let mut store = FileStore::new(path);
            match restore_plan(&args.input, &mut store)? {
                Restored::Candidate(plan) => {
                    let format = codec::decode_with_format(&args.input).ok().map(|(_, f)| f);
                    Ok((plan, format, None))
                }
                Restored::Fallback { plan, error } => Ok((plan, None, Some(error))),
            }
        }
    }
}

pub fn run_decode(args: &DecodeArgs, catalog: &Catalog) -> Result<DecodeOutput, CliError> {
    let (plan, format, recovered_from) = decode_input(args)?;
    let (building, set) = catalog.resolve(&plan.building_id)?;
    let mut report = String::new();
    if let Some(format) = format {
        report.push_str(&format!("Format:     {}\n", format.name()));
    }
    report.push_str(&render_report(&plan, building, set, args.verbose));
    Ok(DecodeOutput {
        report,
        format,
        recovered_from,
    })
}

/// What `run-optimizer` prints.
#[derive(Debug, Clone)]
pub struct OptimizeOutput {
    /// Re-encoded plan, for stdout.
    pub encoded: String,
    /// Text report when `--decode` was given.
    pub report: Option<String>,
    /// Diagnostics for stderr.
    pub diagnostics: Vec<String>,
}

pub fn run_optimize(
    args: &OptimizeArgs,
    catalog: &Catalog,
    config: &PlannerConfig,
) -> Result<OptimizeOutput, CliError> {
    let plan = codec::decode(&args.input)?;
    let (building, set) = catalog.resolve(&plan.building_id)?;

    let mut options = OptimizeOptions::from(config);
    options.clear_existing |= args.clear;
    let outcome = optimize(building, set, &plan, &options);

    let mut diagnostics = vec![format!(
        "{}: {} → {} placements, objective {:.1}",
        building.id,
        plan.placements.len(),
        outcome.plan.placements.len(),
        outcome.objective
    )];
    for w in &outcome.warnings {
        let label = set
            .group(w.group)
            .map(|g| g.label(w.group))
            .unwrap_or_else(|| format!("group {}", w.group));
        diagnostics.push(format!("warning: {} has {} of at least {}", label, w.placed, w.min));
    }

    if outcome.hit_placement_cap {
        diagnostics.push("warning: stopped at max_optimizer_placements; the room may not be full".into());
    }

    // this tool always writes the plain binary format
    if config.encode_mode != EncodeMode::Uncompressed {
        log::warn!("encode_mode {:?} ignored, writing the binary format", config.encode_mode);
    }
    let encoded = codec::encode(&outcome.plan, EncodeMode::Uncompressed).map_err(PlannerError::from)?;
    let report = args
        .decode
        .then(|| render_report(&outcome.plan, building, set, false));
    Ok(OptimizeOutput {
        encoded,
        report,
        diagnostics,
    })
}
