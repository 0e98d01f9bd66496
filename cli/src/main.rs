use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use smart_report_probe::collect::{CollectConfig, collect_all};
use smart_report_probe::locate::require_smartctl;
use smart_report_probe::output::{
    OutputFormat, format_device_list, format_report, format_scan_report,
};
use smart_report_probe::runner::{self, DEFAULT_TIMEOUT_SECS};
use smart_report_probe::{ProbeError, parse_smart_output, probe_device};

/// smartctl missing from the system.
const EXIT_TOOL_MISSING: i32 = 2;
/// Device listing failed.
const EXIT_SCAN_FAILED: i32 = 3;

#[derive(Debug, Parser)]
#[command(name = "smart-report")]
#[command(about = "View SMART disk health via smartctl")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List devices detected by smartctl --scan.
    List(ListArgs),
    /// Report SMART health for one device.
    Info(InfoArgs),
    /// Scan for devices and report on all of them.
    All(AllArgs),
    /// Parse pre-captured smartctl output from stdin without running anything.
    ParseStdin(ParseStdinArgs),
    /// Parse pre-captured smartctl output from a file without running anything.
    ParseFile(ParseFileArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
    /// Timeout for the scan in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Debug, Args)]
struct InfoArgs {
    /// Device path, e.g. /dev/sda or /dev/nvme0n1.
    device: String,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
    /// Include the raw smartctl dump in serialized output.
    #[arg(long)]
    include_raw: bool,
    /// Timeout for the smartctl run in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Debug, Args)]
struct AllArgs {
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
    /// Include the raw smartctl dump for every device.
    #[arg(long)]
    include_raw: bool,
    /// Timeout for each smartctl run in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Number of parallel probe jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Include the raw input text in serialized output.
    #[arg(long)]
    include_raw: bool,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to a file containing captured smartctl output.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Include the raw input text in serialized output.
    #[arg(long)]
    include_raw: bool,
}

struct CliError {
    code: i32,
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            code: 1,
            message: message.into(),
        }
    }
}

impl From<ProbeError> for CliError {
    fn from(err: ProbeError) -> Self {
        let code = match err {
            ProbeError::NotInstalled => EXIT_TOOL_MISSING,
            ProbeError::ScanFailed(_) => EXIT_SCAN_FAILED,
            _ => 1,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List(args) => run_list(args),
        Command::Info(args) => run_info(args),
        Command::All(args) => run_all(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::ParseFile(args) => run_parse_file(args),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err.message);
        std::process::exit(err.code);
    }
}

fn run_list(args: ListArgs) -> Result<(), CliError> {
    let smartctl = require_smartctl()?;
    let scan_output = runner::run_scan(&smartctl, Duration::from_secs(args.timeout_secs))?;
    let devices = runner::scan_devices(&scan_output);
    print!("{}", format_device_list(&devices, args.format)?);
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<(), CliError> {
    let smartctl = require_smartctl()?;
    let report = probe_device(
        &smartctl,
        &args.device,
        Duration::from_secs(args.timeout_secs),
    )?;
    println!("Device: {}", args.device);
    print!("{}", format_report(&report, args.format, args.include_raw)?);
    Ok(())
}

fn run_all(args: AllArgs) -> Result<(), CliError> {
    let smartctl = require_smartctl()?;
    let config = CollectConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        jobs: args.jobs,
    };
    let bundle = collect_all(&smartctl, &config)?;
    print!("{}", format_scan_report(&bundle, args.format, args.include_raw)?);
    Ok(())
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), CliError> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| CliError::new(format!("failed to read stdin: {err}")))?;
    let report = parse_smart_output(&text);
    print!("{}", format_report(&report, args.format, args.include_raw)?);
    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), CliError> {
    let text = fs::read_to_string(&args.input).map_err(|err| {
        CliError::new(format!("failed to read '{}': {err}", args.input.display()))
    })?;
    let report = parse_smart_output(&text);
    print!("{}", format_report(&report, args.format, args.include_raw)?);
    Ok(())
}
