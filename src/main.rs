use anyhow::{Context, Result};
use clap::Parser;
use questions_from_html::{convert, ConvertOptions, DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::env;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML file.
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output JSON path (overwritten on every run).
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Write non-ASCII characters as UTF-8 instead of \uXXXX escapes.
    #[arg(long)]
    utf8: bool,

    /// Only write the output file, do not print the JSON.
    #[arg(long)]
    no_stdout: bool,

    /// Debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    debug!("arguments: {:?}", args);

    let options = ConvertOptions {
        ensure_ascii: !args.utf8,
        print: !args.no_stdout,
    };
    convert(&args.input, &args.output, options).with_context(|| {
        format!(
            "extract questions from {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;
    Ok(())
}

fn init_logging(args: &Args) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("questions_from_html={level}"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("invalid log level '{level_str}', using warn");
            Level::WARN
        }
    }
}
