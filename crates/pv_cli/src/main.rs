// crates/pv_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup and the command dispatch:
// load source → apply params → run one read operation → emit canonical JSON.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const IO: i32 = 4;
}

use std::io::Write;
use std::process::ExitCode;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, parse_entity, parse_topic, Args, CliError, Command, SourcePath};
use pv_core::EngineParams;
use pv_io::{canonical_json, loader};
use pv_pipeline::{PipelineError, RadarProvider};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Bad flags, malformed JSON, unknown param keys
    Usage(String),
    /// Party / topic / score lookup failed
    NotFound(String),
    /// Read / write / size-limit failures
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Usage(m) | MainError::NotFound(m) | MainError::Io(m) => f.write_str(m),
        }
    }
}

impl From<CliError> for MainError {
    fn from(e: CliError) -> Self {
        MainError::Usage(e.to_string())
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("pv: error: {e}");
            return ExitCode::from(exitcodes::USAGE as u8);
        }
    };

    init_tracing(args.quiet);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("pv: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr only; stdout carries the JSON result.
fn init_tracing(quiet: bool) {
    let default = if quiet { "pv=warn" } else { "pv=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Usage(_) => USAGE,
        MainError::NotFound(_) => NOT_FOUND,
        MainError::Io(_) => IO,
    }
}

/// Translate pv_io::IoError into MainError buckets.
fn map_pvio_err(e: pv_io::IoError) -> MainError {
    use pv_io::IoError::*;
    match e {
        Json { pointer, msg } => MainError::Usage(format!("json {pointer}: {msg}")),
        Path(m) => MainError::Io(format!("path: {m}")),
        Limit(m) => MainError::Io(format!("limit: {m}")),
        Hash(m) => MainError::Io(format!("hash: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::NotFound { .. } => MainError::NotFound(e.to_string()),
        PipelineError::Io(io) => map_pvio_err(io),
    }
}

fn load_params(args: &Args) -> Result<EngineParams, MainError> {
    let base = match &args.params {
        Some(p) => loader::load_params(p).map_err(map_pvio_err)?,
        None => EngineParams::default(),
    };
    Ok(args.apply_overrides(base))
}

fn open_provider(args: &Args, params: EngineParams) -> Result<RadarProvider, MainError> {
    let res = match args.source()? {
        SourcePath::Snapshot(p) => pv_pipeline::open_snapshot(&p, params),
        SourcePath::Feed(p) => pv_pipeline::open_feed(&p, params),
    };
    res.map_err(map_pipeline_err)
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let params = load_params(args)?;
    let mut provider = open_provider(args, params)?;
    let scope = args.scope();
    let mixed_fallback = provider.params().mixed_fallback;
    let fallback = |no_fallback: bool| !no_fallback && mixed_fallback;

    let (name, written) = match &args.command {
        Command::Topics => ("topics", emit(args, &provider.topics())?),
        Command::Radar { entity } => {
            let id = parse_entity(entity)?;
            let r = provider.radar(&id, scope).map_err(map_pipeline_err)?;
            ("radar", emit(args, &r)?)
        }
        Command::RadarAll => ("radar-all", emit(args, &provider.all_parties_radar(scope))?),
        Command::Summaries => {
            let out = provider.party_summaries(scope).to_vec();
            ("summaries", emit(args, &out)?)
        }
        Command::Positions { topic, no_fallback } => {
            let t = parse_topic(topic)?;
            let p = provider
                .topic_positions(&t, scope, fallback(*no_fallback))
                .map_err(map_pipeline_err)?;
            ("positions", emit(args, &p)?)
        }
        Command::Detail { entity, topic, no_fallback } => {
            let (e, t) = (parse_entity(entity)?, parse_topic(topic)?);
            let d = provider
                .entity_topic_detail(&e, &t, scope, fallback(*no_fallback))
                .map_err(map_pipeline_err)?;
            ("detail", emit(args, &d)?)
        }
    };

    info!(command = name, %scope, generation = %provider.generation(), bytes = written, "done");
    Ok(())
}

/// Canonical JSON to `--out` (atomic) or stdout. Returns the byte count.
fn emit<T: Serialize + ?Sized>(args: &Args, value: &T) -> Result<usize, MainError> {
    let bytes = canonical_json::to_canonical_bytes(value)
        .map_err(|e| MainError::Io(format!("serialize: {e}")))?;
    match &args.out {
        Some(path) => canonical_json::write_canonical_file(value, path)
            .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes)
                .and_then(|_| out.write_all(b"\n"))
                .map_err(|e| MainError::Io(format!("stdout: {e}")))?;
        }
    }
    Ok(bytes.len())
}
