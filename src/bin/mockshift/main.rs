use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mockshift::{
    collect_inputs, load_config, transform, ParserKind, QuoteStyle, TransformOptions, Transformed,
    DEFAULT_EXTENSIONS, DEFAULT_IGNORE,
};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

/// mockshift: rewrites mockery mocks into jest module mocks
#[derive(Parser, Debug)]
#[command(
    name = "mockshift",
    version,
    about = "Migrates mockery-based tests to jest's built-in module mocking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform files in place
    Run(RunCmd),
}

#[derive(Parser, Debug)]
struct RunCmd {
    /// Files, directories or glob patterns
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<String>,

    /// Parser front-end; chosen per file extension when omitted
    #[arg(long, value_enum)]
    parser: Option<ParserKind>,

    /// Quote style for rewritten path literals
    #[arg(long, value_enum)]
    quote: Option<QuoteStyle>,

    /// Count files without mockery as skipped instead of unmodified
    #[arg(long = "skip-import-detection", action = ArgAction::SetTrue, default_value_t = false)]
    skip_import_detection: bool,

    /// File extensions picked up from directories and globs
    #[arg(long = "extension", value_name = "EXT", action = ArgAction::Append)]
    extensions: Vec<String>,

    /// Glob patterns to leave alone
    #[arg(long = "ignore", value_name = "GLOB", action = ArgAction::Append)]
    ignore: Vec<String>,

    /// Do not write any file
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    dry: bool,

    /// Print transformed sources to stdout
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    print: bool,

    /// Path to config file; if omitted, auto-discovers mockshift.{toml,yaml,yml,json}
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Default)]
struct Summary {
    ok: usize,
    unmodified: usize,
    skipped: usize,
    errors: usize,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(summary) if summary.errors == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<Summary> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(cmd) => run(cmd),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: RunCmd) -> Result<Summary> {
    init_logging(cli.verbose);

    // Effective options: config < env < CLI. For booleans, CLI true wins; false doesn't cancel config.
    let loaded = load_config(cli.config.as_deref())?;
    let quote = cli.quote.or(loaded.cfg.quote).unwrap_or_default();
    let parser = cli.parser.or(loaded.cfg.parser);
    let skip_import_detection =
        cli.skip_import_detection || loaded.cfg.skip_import_detection.unwrap_or(false);
    let extensions: Vec<String> = if !cli.extensions.is_empty() {
        cli.extensions.clone()
    } else {
        loaded
            .cfg
            .extensions
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    };
    let ignore: Vec<String> = if !cli.ignore.is_empty() {
        cli.ignore.clone()
    } else {
        loaded
            .cfg
            .ignore
            .clone()
            .unwrap_or_else(|| DEFAULT_IGNORE.iter().map(|g| g.to_string()).collect())
    };

    let files = collect_inputs(&cli.paths, &extensions, &ignore)?;
    if files.is_empty() {
        bail!("no input files matched {}", cli.paths.join(" "));
    }
    debug!(count = files.len(), ?parser, %skip_import_detection, "collected inputs");

    let mut summary = Summary::default();
    for file in &files {
        let source = match fs::read_to_string(file)
            .with_context(|| format!("failed to read input: {}", file.display()))
        {
            Ok(s) => s,
            Err(err) => {
                error!("{:#}", err);
                summary.errors += 1;
                continue;
            }
        };
        let options = TransformOptions {
            skip_import_detection,
            parser: parser.unwrap_or_else(|| ParserKind::for_path(file)),
            quote,
            ..TransformOptions::default()
        };
        let output = match transform(&source, &options) {
            Ok(output) => output,
            Err(err) => {
                error!("{}: {}", file.display(), err);
                summary.errors += 1;
                continue;
            }
        };
        for d in &output.diagnostics {
            warn!("({} line {}) {}", file.display(), d.position.line, d.message());
        }
        let code = match output.result {
            Transformed::Skipped => {
                summary.skipped += 1;
                continue;
            }
            Transformed::Code(code) if code == source => {
                summary.unmodified += 1;
                continue;
            }
            Transformed::Code(code) => code,
        };
        if cli.print {
            println!("{}", code);
        }
        if !cli.dry {
            if let Err(err) = fs::write(file, &code)
                .with_context(|| format!("failed to write {}", file.display()))
            {
                error!("{:#}", err);
                summary.errors += 1;
                continue;
            }
        }
        summary.ok += 1;
    }

    eprintln!(
        "{} ok, {} unmodified, {} skipped, {} errors",
        summary.ok, summary.unmodified, summary.skipped, summary.errors
    );
    Ok(summary)
}
