use anyhow::{Context as AnyhowContext, Result};
use civic_agent::{seed, Agent, AgentConfig, AgentError};
use civic_forms::AnalysisError;
use civic_protocol::{serialize_json, ActionEvent, ErrorEnvelope, S3Event};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "civic")]
#[command(about = "Municipal assistant backend: garbage routes, park bookings and forms", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (overrides CIVIC_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer an action-group event (JSON) and print the response JSON
    Invoke(JsonInput),

    /// Call one function by name and print the response text
    Call(CallArgs),

    /// Ingest uploaded blank forms from an object-created event (JSON)
    #[command(name = "ingest-form")]
    IngestForm(JsonInput),

    /// Load demo garbage routes and park reservations
    Seed,

    /// Print stored rows of one partition
    Dump(DumpArgs),

    /// Print the effective configuration
    #[command(name = "show-config")]
    ShowConfig,
}

#[derive(Args)]
struct JsonInput {
    /// Inline JSON
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Read JSON from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct CallArgs {
    /// Function name, e.g. get_garbage_pickup_day
    function: String,

    /// Parameter as name=value (repeatable)
    #[arg(short, long = "param", value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// Session attribute as key=value (repeatable)
    #[arg(short, long = "session", value_parser = parse_pair)]
    session: Vec<(String, String)>,
}

#[derive(Args)]
struct DumpArgs {
    /// Partition key, e.g. "PP1#" or "#Fpermit#"
    pk: String,

    /// Sort-key prefix
    #[arg(long, default_value = "")]
    prefix: String,
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // The AWS SDK is noisy below warn
    if !cli.verbose {
        builder.filter_module("aws_config", log::LevelFilter::Warn);
        builder.filter_module("aws_smithy_runtime", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AgentConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Commands::ShowConfig = cli.command {
        return print_stdout(&serde_json::to_string_pretty(&config)?);
    }

    let agent = Agent::from_config(&config)
        .await
        .context("Failed to initialise backends")?;

    match cli.command {
        Commands::Invoke(input) => run_invoke(&agent, input).await,
        Commands::Call(args) => run_call(&agent, args).await,
        Commands::IngestForm(input) => run_ingest(&agent, input).await,
        Commands::Seed => {
            let report = seed(agent.records()).await?;
            print_stdout(&serialize_json(&report)?)
        }
        Commands::Dump(args) => {
            let rows = agent.records().store().query(&args.pk, &args.prefix).await?;
            print_stdout(&serde_json::to_string_pretty(&rows)?)
        }
        Commands::ShowConfig => Ok(()),
    }
}

fn read_payload(input: &JsonInput) -> Result<String> {
    if let Some(raw) = &input.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &input.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&output)
}

fn fail(envelope: ErrorEnvelope) -> Result<()> {
    print_stdout(&serialize_json(&envelope)?)?;
    std::process::exit(1);
}

async fn run_invoke(agent: &Agent, input: JsonInput) -> Result<()> {
    let raw = read_payload(&input)?;
    let event: ActionEvent = match serde_json::from_str(&raw) {
        Ok(event) => event,
        Err(err) => {
            return fail(
                ErrorEnvelope::new("invalid_event", format!("Invalid action-group event: {err}"))
                    .with_hint("expected {\"actionGroup\", \"function\", \"parameters\": [{\"name\", \"value\"}]}"),
            )
        }
    };
    let response = agent.handle_event(&event).await;
    print_json(&response, input.pretty)
}

async fn run_call(agent: &Agent, args: CallArgs) -> Result<()> {
    let mut event = ActionEvent::new("cli", args.function);
    for (name, value) in args.params {
        event = event.with_parameter(name, value);
    }
    for (key, value) in args.session {
        event = event.with_session_attribute(key, value);
    }
    let response = agent.handle_event(&event).await;
    print_stdout(response.body())
}

async fn run_ingest(agent: &Agent, input: JsonInput) -> Result<()> {
    let raw = read_payload(&input)?;
    let event: S3Event = match serde_json::from_str(&raw) {
        Ok(event) => event,
        Err(err) => {
            return fail(ErrorEnvelope::new(
                "invalid_event",
                format!("Invalid object-created event: {err}"),
            ))
        }
    };
    match agent.ingest(&event).await {
        Ok(report) => print_json(&report, input.pretty),
        Err(err) => fail(envelope_for(&err)),
    }
}

fn envelope_for(err: &AgentError) -> ErrorEnvelope {
    let envelope = ErrorEnvelope::new(err.code(), err.to_string());
    match err {
        AgentError::NotConfigured(_) => envelope.with_hint(
            "set CIVIC_ANALYSIS_DIR for saved analyses or CIVIC_ANALYZER=textract, and FORMS_INGEST_BUCKET",
        ),
        AgentError::Analysis(AnalysisError::AnalysisTimeout { .. }) => {
            envelope.with_hint("raise CIVIC_POLL_MAX_ATTEMPTS / CIVIC_POLL_DEADLINE_MS for long documents")
        }
        AgentError::Analysis(_) => {
            envelope.with_hint("check that every object exists and is a readable form document")
        }
        _ => envelope,
    }
}
