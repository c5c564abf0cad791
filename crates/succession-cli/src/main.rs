//! Succession CLI
//!
//! Command-line front end for the lineage engine:
//! - Exporting the full lineage graph (JSON or Graphviz DOT)
//! - Extracting one clergy member's upward chain
//! - Listing bishops eligible to have performed an event on given dates
//! - Auditing a registry snapshot for data-quality problems
//! - Applying structured clergy forms to a snapshot

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use succession_intake::{ClergyForm, Intake};
use succession_lineage::{
    build_graph, lineage_chain, render_chain_dot, render_graph_dot, CandidateQuery, EngineConfig,
    GraphNode, LineageChain, LineageIndex,
};
use succession_model::{parse_event_date, ClergyId, Snapshot};

mod audit_report;

#[derive(Parser)]
#[command(name = "succession")]
#[command(author, version, about = "Apostolic succession lineage engine")]
struct Cli {
    /// Engine configuration (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the lineage graph of all active clergy.
    Graph {
        /// Registry snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        /// Output format: json|dot
        #[arg(long, default_value = "json")]
        format: String,
        /// Output path (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Extract the upward lineage chain of one clergy member.
    Lineage {
        #[arg(long)]
        snapshot: PathBuf,
        /// Clergy id to start from.
        #[arg(long)]
        clergy: i64,
        /// Output format: json|dot
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List bishops who could have ordained or consecrated on the given dates.
    Candidates {
        #[arg(long)]
        snapshot: PathBuf,
        /// Ordination date (YYYY-MM-DD).
        #[arg(long)]
        ordination_date: Option<String>,
        /// Consecration date (YYYY-MM-DD).
        #[arg(long)]
        consecration_date: Option<String>,
        /// Clergy id being edited; never offered as a candidate.
        #[arg(long)]
        exclude: Option<i64>,
        /// Output format: json|text
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Report data-quality problems in a snapshot.
    Audit {
        #[arg(long)]
        snapshot: PathBuf,
        /// Output format: json|text
        #[arg(long, default_value = "text")]
        format: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Do not fail the process even if errors are found (always exit 0).
        #[arg(long)]
        no_fail: bool,
    },

    /// Apply a clergy form (JSON) and write the updated snapshot.
    Apply {
        #[arg(long)]
        snapshot: PathBuf,
        /// Clergy form (JSON).
        #[arg(long)]
        form: PathBuf,
        /// Where to write the updated snapshot (defaults to `--snapshot`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Soft-delete a clergy record and write the updated snapshot.
    Delete {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        clergy: i64,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Graph {
            snapshot,
            format,
            out,
        } => cmd_graph(&config, &snapshot, &format, out.as_ref()),
        Commands::Lineage {
            snapshot,
            clergy,
            format,
            out,
        } => cmd_lineage(&config, &snapshot, ClergyId(clergy), &format, out.as_ref()),
        Commands::Candidates {
            snapshot,
            ordination_date,
            consecration_date,
            exclude,
            format,
        } => cmd_candidates(
            &config,
            &snapshot,
            ordination_date.as_deref(),
            consecration_date.as_deref(),
            exclude.map(ClergyId),
            &format,
        ),
        Commands::Audit {
            snapshot,
            format,
            out,
            no_fail,
        } => audit_report::cmd_audit(&config, &snapshot, &format, out.as_ref(), no_fail),
        Commands::Apply {
            snapshot,
            form,
            out,
        } => cmd_apply(&config, &snapshot, &form, out.as_ref()),
        Commands::Delete {
            snapshot,
            clergy,
            out,
        } => cmd_delete(&config, &snapshot, ClergyId(clergy), out.as_ref()),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let snapshot =
        Snapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        clergy = snapshot.clergy.len(),
        ordinations = snapshot.ordinations.len(),
        consecrations = snapshot.consecrations.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

pub(crate) fn emit(out: Option<&PathBuf>, rendered: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let text = snapshot.to_json_pretty()?;
    fs::write(path, text).with_context(|| format!("writing snapshot {}", path.display()))?;
    eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
    Ok(())
}

/// Unreadable or year-only dates leave the filter unset and print a warning.
fn parse_date_arg(flag: &str, value: Option<&str>) -> Option<NaiveDate> {
    let text = value?;
    let parsed = parse_event_date(Some(text), None);
    let exact = parsed.date.exact();
    if exact.is_none() {
        tracing::warn!(flag, text, "ignoring date filter without a full date");
        eprintln!(
            "{} ignoring {flag} `{text}` (expected YYYY-MM-DD)",
            "warning:".yellow().bold()
        );
    }
    exact
}

fn normalized_format<'a>(format: &str, allowed: &'a [&'a str]) -> Result<&'a str> {
    let format = format.trim().to_ascii_lowercase();
    allowed
        .iter()
        .copied()
        .find(|f| *f == format)
        .ok_or_else(|| anyhow!("unknown --format `{format}` (expected {})", allowed.join("|")))
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_graph(
    config: &EngineConfig,
    snapshot_path: &Path,
    format: &str,
    out: Option<&PathBuf>,
) -> Result<()> {
    let format = normalized_format(format, &["json", "dot"])?;
    let snapshot = load_snapshot(snapshot_path)?;
    let index = LineageIndex::with_config(&snapshot, config);
    let graph = build_graph(&index);

    let rendered = match format {
        "dot" => render_graph_dot(&graph),
        _ => serde_json::to_string_pretty(&graph)?,
    };
    emit(out, &rendered)
}

#[derive(Serialize)]
struct LineageOutput<'a> {
    #[serde(flatten)]
    chain: &'a LineageChain,
    nodes: Vec<GraphNode>,
}

fn cmd_lineage(
    config: &EngineConfig,
    snapshot_path: &Path,
    target: ClergyId,
    format: &str,
    out: Option<&PathBuf>,
) -> Result<()> {
    let format = normalized_format(format, &["json", "dot"])?;
    let snapshot = load_snapshot(snapshot_path)?;
    let index = LineageIndex::with_config(&snapshot, config);
    let chain = lineage_chain(&index, target)?;

    let rendered = match format {
        "dot" => render_chain_dot(&index, &chain),
        _ => serde_json::to_string_pretty(&LineageOutput {
            chain: &chain,
            nodes: chain.nodes(&index),
        })?,
    };
    emit(out, &rendered)
}

fn cmd_candidates(
    config: &EngineConfig,
    snapshot_path: &Path,
    ordination_date: Option<&str>,
    consecration_date: Option<&str>,
    exclude: Option<ClergyId>,
    format: &str,
) -> Result<()> {
    let format = normalized_format(format, &["json", "text"])?;
    let mut query = CandidateQuery::new()
        .ordination_date(parse_date_arg("--ordination-date", ordination_date))
        .consecration_date(parse_date_arg("--consecration-date", consecration_date));
    if let Some(id) = exclude {
        query = query.excluding(id);
    }

    let snapshot = load_snapshot(snapshot_path)?;
    let index = LineageIndex::with_config(&snapshot, config);
    let entries = query.entries(&index);

    let rendered = match format {
        "text" => {
            let mut out = format!("{} candidate(s)\n", entries.len());
            for e in &entries {
                let life = match (e.date_of_birth, e.date_of_death) {
                    (None, None) => String::new(),
                    (born, died) => format!(
                        " ({}-{})",
                        born.map(|d| d.to_string()).unwrap_or_default(),
                        died.map(|d| d.to_string()).unwrap_or_default()
                    ),
                };
                out.push_str(&format!("  #{} {} [{}]{}\n", e.id, e.name, e.rank, life));
            }
            out
        }
        _ => serde_json::to_string_pretty(&entries)?,
    };
    emit(None, &rendered)
}

fn cmd_apply(
    config: &EngineConfig,
    snapshot_path: &Path,
    form_path: &Path,
    out: Option<&PathBuf>,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let text = fs::read_to_string(form_path)
        .with_context(|| format!("reading form {}", form_path.display()))?;
    let form = ClergyForm::from_json_str(&text)
        .with_context(|| format!("parsing form {}", form_path.display()))?;

    let mut intake = Intake::new(snapshot, config.clone());
    let applied = intake.apply(&form)?;
    for w in &applied.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), w);
    }

    let target = out.map(PathBuf::as_path).unwrap_or(snapshot_path);
    save_snapshot(intake.snapshot(), target)?;
    println!("{}", serde_json::to_string_pretty(&applied)?);
    Ok(())
}

fn cmd_delete(
    config: &EngineConfig,
    snapshot_path: &Path,
    id: ClergyId,
    out: Option<&PathBuf>,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let mut intake = Intake::new(snapshot, config.clone());
    intake.soft_delete(id)?;

    let target = out.map(PathBuf::as_path).unwrap_or(snapshot_path);
    save_snapshot(intake.snapshot(), target)
}
