use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tgspack", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a Lottie JSON (or .tgs) file into a .tgs artifact under a byte budget.
    Pack(PackArgs),
    /// Cheap pre-flight check; exits non-zero when the input is not an animation.
    Check(CheckArgs),
    /// Inflate a .tgs artifact back to JSON.
    Unpack(UnpackArgs),
    /// Print the effective strategy table as JSON.
    Strategies(StrategiesArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input Lottie JSON or .tgs.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output .tgs path.
    #[arg(long)]
    out: PathBuf,

    /// Byte budget (overrides the options file).
    #[arg(long)]
    budget: Option<usize>,

    /// JSON options file (budget, gzip level, strategy table).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON on stdout instead of text on stderr.
    #[arg(long, default_value_t = false)]
    report_json: bool,

    /// Exit with status 2 when no strategy meets the budget.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// File to check.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct UnpackArgs {
    /// Input .tgs artifact.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Indent the JSON.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct StrategiesArgs {
    /// JSON options file whose table should be printed instead of the default.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Check(args) => cmd_check(args),
        Command::Unpack(args) => cmd_unpack(args),
        Command::Strategies(args) => cmd_strategies(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "tgspack=debug",
        _ => "tgspack=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_opts(config: Option<&Path>) -> anyhow::Result<tgspack::CompressOpts> {
    match config {
        Some(path) => tgspack::CompressOpts::from_path(path)
            .with_context(|| format!("load options '{}'", path.display())),
        None => Ok(tgspack::CompressOpts::default()),
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read input '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<ExitCode> {
    let mut opts = load_opts(args.config.as_deref())?;
    if let Some(budget) = args.budget {
        opts.budget_bytes = budget;
    }

    let input = read_input(&args.in_path)?;
    let (bytes, report) = tgspack::compress_with(&input, &opts)
        .with_context(|| format!("compress '{}'", args.in_path.display()))?;
    write_output(&args.out, &bytes)?;

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("{report}");
        eprintln!("wrote {}", args.out.display());
    }

    if args.strict && !report.met_budget {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let input = read_input(&args.in_path)?;
    if tgspack::validate(&input) {
        println!("ok {}", args.in_path.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("not an animation: {}", args.in_path.display());
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_unpack(args: UnpackArgs) -> anyhow::Result<ExitCode> {
    let input = read_input(&args.in_path)?;
    let json = if args.pretty {
        let doc = tgspack::parse(&input)
            .with_context(|| format!("parse '{}'", args.in_path.display()))?;
        tgspack::serialize_pretty(&doc)?
    } else {
        tgspack::decode_tgs(&input)
            .with_context(|| format!("inflate '{}'", args.in_path.display()))?
    };
    write_output(&args.out, &json)?;
    eprintln!("wrote {}", args.out.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_strategies(args: StrategiesArgs) -> anyhow::Result<ExitCode> {
    let opts = load_opts(args.config.as_deref())?;
    for s in &opts.strategies {
        eprintln!("{s}");
    }
    println!("{}", serde_json::to_string_pretty(&opts.strategies)?);
    Ok(ExitCode::SUCCESS)
}
