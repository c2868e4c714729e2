use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use nmapwrap::{View, XmlConfig};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod report;

use report::{PortScan, Report};

#[derive(Debug, Parser)]
#[command(
    name = "nmapwrap",
    version,
    about = "Summarize nmap scans through typed XML views"
)]
struct Args {
    /// Read nmap XML from a file instead of running nmap ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Maximum element nesting depth (0 or values above 256 mean 256)
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<u16>,
    /// Maximum input size in bytes (0 disables the limit)
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Arguments passed to nmap when no input file is given
    #[arg(
        value_name = "NMAP_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    nmap_args: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let xml = match &args.input {
        Some(path) => read_input(path)?,
        None if args.nmap_args.is_empty() => {
            bail!("nothing to report: pass --input or arguments for nmap");
        }
        None => {
            info!(args = ?args.nmap_args, "running nmap");
            nmapwrap::scan(&args.nmap_args).context("nmap scan failed")?
        }
    };

    let defaults = XmlConfig::default();
    let config = XmlConfig::new(
        args.max_depth.unwrap_or(defaults.max_depth),
        args.max_size.unwrap_or(defaults.max_size),
    );
    let scan = PortScan::parse_with_config(&xml, config).context("failed to parse nmap XML")?;
    let report = Report::from_scan(&scan)?;
    debug!(hosts = report.hosts.len(), "report built");

    let rendered = match args.format {
        FormatArg::Text => report.to_string(),
        FormatArg::Json => {
            let mut json =
                serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    write_output(args.output.as_deref(), rendered.as_bytes())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        if buffer.trim().is_empty() {
            bail!("no input provided on stdin");
        }
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => io::stdout()
            .write_all(data)
            .context("failed to write stdout"),
    }
}
