// crates/pv_cli/src/args.rs
//
// Offline CLI argument surface.
// - One data source: --feed, else --snapshot (or PV_SNAPSHOT)
// - Local paths only (reject any scheme:// like http/https/file)
// - Scope is lenient: anything other than "mixed" reads as official
// - Engine params: optional JSON file (--params / PV_PARAMS), then flags on top

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pv_core::{EngineParams, EntityId, Scope, TopicId};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pv",
    disable_help_subcommand = true,
    about = "Offline radar and summary engine for party stance snapshots"
)]
pub struct Args {
    // --- Data source ---
    /// Snapshot JSON path.
    #[arg(long, env = "PV_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,
    /// Recorded live responses (`{"topics", "positions", "positions_mixed"}`); wins over --snapshot.
    #[arg(long, global = true)]
    pub feed: Option<PathBuf>,

    // --- Engine params ---
    /// Engine parameter JSON path.
    #[arg(long, env = "PV_PARAMS", global = true)]
    pub params: Option<PathBuf>,
    /// Provenance scope: official | mixed.
    #[arg(long, env = "PV_SCOPE", default_value = "official", global = true)]
    pub scope: String,
    /// Attach per-topic contributions to radar-all categories (single radars always carry them).
    #[arg(long, global = true)]
    pub include_topics: bool,
    /// Drop categories with no scores from radar output.
    #[arg(long, global = true)]
    pub omit_empty_categories: bool,

    // --- Output ---
    /// Write JSON here instead of stdout.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,
    /// Only warnings and errors on stderr.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List active topics.
    Topics,
    /// Radar for one party.
    Radar {
        #[arg(long)]
        entity: String,
    },
    /// Radars for every party.
    RadarAll,
    /// Summary paragraphs for every party.
    Summaries,
    /// Positions block for a topic.
    Positions {
        #[arg(long)]
        topic: String,
        /// Do not serve official data when the topic has no mixed run.
        #[arg(long)]
        no_fallback: bool,
    },
    /// One party's score on one topic.
    Detail {
        #[arg(long)]
        entity: String,
        #[arg(long)]
        topic: String,
        #[arg(long)]
        no_fallback: bool,
    },
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    BadId(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            BadId(s) => write!(f, "{s} must not be blank"),
        }
    }
}
impl std::error::Error for CliError {}

/// Where the data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePath {
    Snapshot(PathBuf),
    Feed(PathBuf),
}

impl Args {
    pub fn scope(&self) -> Scope {
        Scope::normalize(Some(self.scope.as_str()))
    }

    pub fn source(&self) -> Result<SourcePath, CliError> {
        match (&self.snapshot, &self.feed) {
            (_, Some(f)) => Ok(SourcePath::Feed(f.clone())),
            (Some(s), None) => Ok(SourcePath::Snapshot(s.clone())),
            (None, None) => Err(CliError::Missing("--snapshot or --feed")),
        }
    }

    /// Flags on top of file params (flags can only switch behaviour on).
    pub fn apply_overrides(&self, mut params: EngineParams) -> EngineParams {
        if self.include_topics {
            params.include_topics = true;
        }
        if self.omit_empty_categories {
            params.include_empty_categories = false;
        }
        params
    }

    fn paths(&self) -> impl Iterator<Item = &Path> {
        [
            self.snapshot.as_deref(),
            self.feed.as_deref(),
            self.params.as_deref(),
            self.out.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

pub fn parse_entity(raw: &str) -> Result<EntityId, CliError> {
    raw.trim().parse().map_err(|_| CliError::BadId("--entity"))
}

pub fn parse_topic(raw: &str) -> Result<TopicId, CliError> {
    raw.trim().parse().map_err(|_| CliError::BadId("--topic"))
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

fn validate(args: Args) -> Result<Args, CliError> {
    for p in args.paths() {
        ensure_local_path(p)?;
    }
    args.source()?;
    match &args.command {
        Command::Radar { entity } => {
            parse_entity(entity)?;
        }
        Command::Positions { topic, .. } => {
            parse_topic(topic)?;
        }
        Command::Detail { entity, topic, .. } => {
            parse_entity(entity)?;
            parse_topic(topic)?;
        }
        Command::Topics | Command::RadarAll | Command::Summaries => {}
    }
    Ok(args)
}
