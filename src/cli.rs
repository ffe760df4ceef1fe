use crate::config::load_config;
use crate::document::GraphDocument;
use crate::ingest::ingest_ai_response_with;
use crate::ir::{LayoutPreference, ViewMode};
use crate::layout::{Layouter, NoJitter, RandomJitter};
use crate::layout_dump::write_layout_dump;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jirai-layout",
    version,
    about = "Lay out a Jirai board for the analysis, management or workflow view"
)]
pub struct Args {
    /// Input graph document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// View mode (analysis, management, workflow); overrides the document's viewMode
    #[arg(short = 'm', long = "mode", value_parser = parse_mode)]
    pub mode: Option<ViewMode>,

    /// Analysis layout preference (organic, horizontal, vertical); overrides
    /// the document's layoutPreference
    #[arg(short = 'p', long = "preference", value_parser = parse_preference)]
    pub preference: Option<LayoutPreference>,

    /// Config JSON file with layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for the organic jitter
    #[arg(long = "seed", conflicts_with = "no_jitter")]
    pub seed: Option<u64>,

    /// Disable the organic jitter
    #[arg(long = "no-jitter")]
    pub no_jitter: bool,

    /// Day treated as today (YYYY-MM-DD, UTC midnight)
    #[arg(long = "today", value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Treat the input as a raw model response instead of a graph document
    #[arg(long = "ai")]
    pub ai: bool,

    /// Write a layout dump (positions plus bounds) instead of the document
    #[arg(long = "dump")]
    pub dump: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_mode(value: &str) -> std::result::Result<ViewMode, String> {
    ViewMode::from_token(value).ok_or_else(|| format!("unknown view mode: {value}"))
}

fn parse_preference(value: &str) -> std::result::Result<LayoutPreference, String> {
    LayoutPreference::from_token(value).ok_or_else(|| format!("unknown layout preference: {value}"))
}

fn parse_today(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| format!("{value}: {err}"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    let mut layouter = build_layouter(&args, config.layout.clone());

    let (mut document, mode, preference) = if args.ai {
        let input = read_input(args.input.as_deref())?;
        let mode = args.mode.unwrap_or_default();
        let generated = ingest_ai_response_with(&input, mode, &mut layouter, &config.ingest)?;
        let document = GraphDocument {
            nodes: generated.nodes,
            edges: generated.edges,
            view_mode: Some(mode),
            layout_preference: Some(LayoutPreference::Organic),
        };
        (document, mode, LayoutPreference::Organic)
    } else {
        let document = load_document(args.input.as_deref())?;
        let mode = args.mode.unwrap_or(document.view_mode());
        let preference = args.preference.unwrap_or(document.layout_preference());
        (document, mode, preference)
    };

    if !args.ai {
        document.nodes = layouter.reapply(&document.nodes, &document.edges, mode, preference);
        document.view_mode = Some(mode);
        document.layout_preference = Some(preference);
    }
    info!(
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        mode = ?mode,
        preference = ?preference,
        "layout complete"
    );

    if args.dump {
        let output = ensure_output(&args.output, "dump")?;
        return write_layout_dump(&output, &document.nodes, mode, preference, &config.layout.layered);
    }

    let json = document.to_json_pretty()?;
    write_output(&json, args.output.as_deref())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_layouter(args: &Args, layout: crate::config::LayoutConfig) -> Layouter {
    let mut layouter = Layouter::new(layout);
    if let Some(today) = args.today {
        layouter = layouter.with_now(today.and_time(chrono::NaiveTime::MIN));
    }
    if args.no_jitter {
        layouter = layouter.with_jitter(NoJitter);
    } else if let Some(seed) = args.seed {
        layouter = layouter.with_jitter(RandomJitter::seeded(seed));
    }
    layouter
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn load_document(path: Option<&Path>) -> Result<GraphDocument> {
    match path {
        Some(path) if path != Path::new("-") => Ok(GraphDocument::read(path)?),
        _ => Ok(GraphDocument::from_json(&read_input(None)?)?),
    }
}

fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn ensure_output(output: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", what))
}
