//! Phenograph CLI
//!
//! Inspect an OBO ontology from the command line:
//! - `check`: build the graph and verify it is a single-rooted DAG
//! - `lookup`: show one term (alternate ids accepted)
//! - `closure` / `descendants`: transitive parents / children of a set of terms

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phenograph_ontology::Ontology;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod report;

use report::{ClosureReport, SummaryReport, TermReport};

#[derive(Parser)]
#[command(name = "phenograph")]
#[command(author, version, about = "Phenograph: OBO ontology graph inspector")]
struct Cli {
    /// Ontology file in OBO format (e.g. `hp.obo`)
    ontology: PathBuf,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph, check it for cycles and print a summary.
    Check,

    /// Show a term with its parents, children and metadata tags.
    Lookup {
        /// Canonical or alternate id
        id: String,
    },

    /// Print the ancestor closure of the given terms.
    Closure {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the given terms plus all of their descendants.
    Descendants {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Ontology> {
    let started = Instant::now();
    let ontology = Ontology::from_obo_path(path)
        .with_context(|| format!("failed to load ontology from {}", path.display()))?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ontology loaded"
    );
    Ok(ontology)
}

fn emit<T: serde::Serialize>(value: &T, json: bool, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn cmd_check(ontology: &Ontology, json: bool) -> Result<()> {
    ontology.check_acyclic().context("ontology is not a DAG")?;
    emit(&SummaryReport::new(ontology), json, SummaryReport::render)
}

fn cmd_lookup(ontology: &Ontology, id: &str, json: bool) -> Result<()> {
    let canonical = ontology.resolve_alias(id)?;
    let term = ontology.lookup(canonical)?;
    emit(&TermReport::new(term), json, TermReport::render)
}

fn cmd_closure(ontology: &Ontology, ids: &[String], descendants: bool, json: bool) -> Result<()> {
    let found = if descendants {
        ontology.descendants(ids)?
    } else {
        ontology.closure(ids)?
    };
    let report = ClosureReport::new(ontology, ids, found);
    emit(&report, json, ClosureReport::render)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ontology = load(&cli.ontology)?;
    match &cli.command {
        Commands::Check => cmd_check(&ontology, cli.json),
        Commands::Lookup { id } => cmd_lookup(&ontology, id, cli.json),
        Commands::Closure { ids } => cmd_closure(&ontology, ids, false, cli.json),
        Commands::Descendants { ids } => cmd_closure(&ontology, ids, true, cli.json),
    }
}
