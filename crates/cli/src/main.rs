//! Simulation harness CLI.
//!
//! This binary runs one simulation of a bundled design. It performs:
//! 1. **Configuration:** Parses flags (optionally layered over a JSON config file).
//! 2. **Initialization:** Builds the design and loads the initial memory image, if given.
//! 3. **Run:** Resets the design and clocks it until halt or the cycle budget runs out.
//! 4. **Output:** Writes the optional waveform trace and memory dump, then reports the cycle count.
//!
//! Exit status is 0 on completion and 1 on any configuration or initial-load failure.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use simharness_core::{DesignKind, Driver, DumpRequest, RunConfig, RunSummary, SimError};

#[derive(Parser, Debug)]
#[command(
    name = "simulator",
    version,
    about = "Cycle-accurate test harness for simulated hardware designs",
    long_about = "Resets the design, clocks it until it raises halt or the cycle budget runs out, \
                  then writes the requested memory dump.\n\n\
                  Examples:\n  \
                  simulator program.hex\n  \
                  simulator -w -c 500 program.hex\n  \
                  simulator -d out.bin,0,100 program.hex\n  \
                  simulator --design counter --depth 64 -d fill.bin,0,100"
)]
struct Cli {
    /// Record a waveform trace (see --trace for the path).
    #[arg(short = 'w')]
    waveform: bool,

    /// Dump memory after the run: <filename>,<start_hex>,<length_hex>.
    #[arg(short = 'd', value_name = "FILE,START,LENGTH")]
    dump: Option<DumpRequest>,

    /// Maximum cycles to run after reset [default: 20000].
    #[arg(short = 'c', value_name = "CYCLES")]
    cycles: Option<u64>,

    /// Waveform trace path [default: trace.vcd].
    #[arg(long, value_name = "PATH")]
    trace: Option<PathBuf>,

    /// Design to simulate (accumulator, counter) [default: accumulator].
    #[arg(long, value_name = "NAME")]
    design: Option<DesignKind>,

    /// System memory depth in words [default: 65536].
    #[arg(long, value_name = "WORDS")]
    depth: Option<usize>,

    /// JSON run configuration; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress the per-cycle state lines.
    #[arg(short, long)]
    quiet: bool,

    /// Hex-encoded initial memory image, loaded at address 0.
    image: Option<PathBuf>,
}

#[derive(Debug)]
enum CliError {
    Usage(clap::Error),
    Config(SimError),
}

impl Cli {
    /// Resolves the flags into a run configuration.
    fn into_config(self) -> Result<RunConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        config.waveform |= self.waveform;
        if let Some(dump) = self.dump {
            config.dump = Some(dump);
        }
        if let Some(cycles) = self.cycles {
            config.max_cycles = cycles;
        }
        if let Some(trace) = self.trace {
            config.trace_path = trace;
        }
        if let Some(design) = self.design {
            config.design = design;
        }
        if let Some(depth) = self.depth {
            config.memory_depth = depth;
        }
        if self.quiet {
            config.echo_state = false;
        }
        if let Some(image) = self.image {
            config.initial_memory = Some(image);
        }
        Ok(config)
    }
}

fn parse_config<I, T>(args: I) -> Result<RunConfig, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(CliError::Usage)?;
    cli.into_config().map_err(CliError::Config)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(config: RunConfig) -> Result<RunSummary, SimError> {
    let module = config.design.build(config.memory_depth)?;
    let mut driver = Driver::new(module, config);
    let config = driver.config();
    info!(
        design = %config.design,
        depth = config.memory_depth,
        max_cycles = config.max_cycles,
        waveform = config.waveform,
        "starting simulation"
    );
    driver.run()
}

/// Exit status for a failed argument parse: 0 for help/version output, 1 otherwise.
const fn usage_exit_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Prints a parse error (or help text) and returns the matching exit code.
fn report_usage(e: &clap::Error) -> ExitCode {
    let _ = e.print();
    let status = usage_exit_status(e.kind());
    if status != 0 && !e.to_string().contains("Usage:") {
        eprintln!("\n{}", Cli::command().render_usage());
    }
    ExitCode::from(status)
}

fn main() -> ExitCode {
    init_logging();

    let config = match parse_config(std::env::args_os()) {
        Ok(config) => config,
        Err(CliError::Usage(e)) => return report_usage(&e),
        Err(CliError::Config(e)) => {
            error!("{e}");
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    match run(config) {
        Ok(summary) => {
            if let Some(dump) = summary.dump.filter(|d| !d.is_complete()) {
                warn!(status = ?dump.status, "memory dump incomplete");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
