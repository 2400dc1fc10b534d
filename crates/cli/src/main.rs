mod echo;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use lawdispatch_core::{
    AnchorGenerator, BbRenderer, Config, FetchConfig, LawDispatchError, LawUpdater, embed_template, fetch_file,
    fetch_stdin,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::echo::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Keep law dispatches in sync with the forum law archive
#[derive(Parser, Debug)]
#[command(name = "lawdispatch")]
#[command(version)]
#[command(about = "Convert forum law pages into BBCode dispatches", long_about = None)]
struct Args {
    /// Config file (default: $LAWDISPATCH_CONFIG, then the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only update these laws (repeatable)
    #[arg(short = 'l', long = "law", value_name = "NAME")]
    laws: Vec<String>,

    /// Render a single local HTML file, or "-" for stdin, instead of updating all laws
    #[arg(short, long, value_name = "INPUT")]
    input: Option<String>,

    /// Print the rendered BBCode without embedding it into the template (with --input)
    #[arg(long, requires = "input")]
    no_template: bool,

    /// Output file (with --input, default: stdout)
    #[arg(short, long, value_name = "FILE", requires = "input")]
    output: Option<PathBuf>,

    /// Do not update the dispatch registry
    #[arg(long)]
    skip_registry: bool,

    /// Seconds to wait between two laws (default: from config)
    #[arg(long, value_name = "SECS")]
    delay: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<Option<Config>, LawDispatchError> {
    let loaded = match path {
        Some(path) => Config::locate(Some(path), None),
        None => Config::load(),
    };

    match loaded {
        Ok((config, path)) => {
            tracing::info!(path = %path.display(), "loaded configuration");
            Ok(Some(config))
        }
        Err(err @ LawDispatchError::FirstRun(_)) => {
            print_warning(&err.to_string());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Renders one local document, for checking a config against a law page.
fn render_input(args: &Args, input: &str, config: &Config) -> anyhow::Result<()> {
    if args.verbose {
        let source = if input == "-" { "stdin".to_string() } else { format!("file {}", input.bright_white()) };
        print_step(1, 3, &format!("Reading from {}", source));
    }

    let html = if input == "-" {
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if args.verbose {
        eprintln!("  {} {}\n", "Size:".dimmed(), format_size(html.len()).bright_white());
        print_step(2, 3, "Rendering BBCode");
    }

    let renderer = BbRenderer::new(&config.bb_lookup).context("Invalid [bb_lookup] configuration")?;
    let mut anchors = AnchorGenerator::new(&config.anchor_lookup).context("Invalid [anchor_lookup] configuration")?;
    let bb_text = renderer.render(&html, &mut anchors).context("Failed to render law")?;

    let output = if args.no_template {
        bb_text
    } else {
        embed_template(&bb_text, &config.general.std_template_path).context("Failed to embed law into template")?
    };

    if args.verbose {
        print_step(3, 3, "Writing output");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    Ok(())
}

async fn update_laws(args: &Args, config: Config) -> anyhow::Result<()> {
    let law_count = if args.laws.is_empty() { config.laws.len() } else { args.laws.len() };
    if args.verbose {
        print_info(&format!("Updating {} law dispatch(es)", law_count));
        eprintln!();
    }

    let fetch = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
    };

    let mut updater = LawUpdater::new(config)
        .fetch_config(fetch)
        .only(args.laws.clone())
        .skip_registry(args.skip_registry);
    if let Some(delay) = args.delay {
        updater = updater.delay(Duration::from_secs(delay));
    }

    let started = Instant::now();
    let report = updater.run().await.context("Law update aborted")?;

    print_report(&report);
    if args.verbose {
        print_timing("Elapsed", started.elapsed(), law_count);
    }

    if !report.is_success() {
        bail!("{} law dispatch(es) could not be generated", report.failed.len());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
    }

    let Some(config) = load_config(args.config.clone()).context("Failed to load configuration")? else {
        return Ok(());
    };

    match args.input.as_deref() {
        Some(input) => render_input(&args, input, &config),
        None => update_laws(&args, config).await,
    }
}
