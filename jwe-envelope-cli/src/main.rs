//! JWE envelope inspector.
//!
//! Reads an envelope in compact or JSON form from a file or stdin and prints
//! a summary, a re-serialization, or the reconstructed AAD.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use jwe_envelope_core::{parse_with, Envelope, ParseOptions, SerializeOptions};

/// Inspect and convert JWE envelopes
#[derive(Parser, Debug)]
#[command(name = "jwe-envelope")]
#[command(version, about, long_about = None)]
struct Args {
    /// Read the envelope from this file instead of stdin
    #[arg(short, long, env = "JWE_ENVELOPE_INPUT")]
    input: Option<PathBuf>,

    /// Reject inputs longer than this many bytes
    #[arg(long, env = "JWE_ENVELOPE_MAX_INPUT")]
    max_input_len: Option<usize>,

    /// Keep the received protected-header bytes when re-serializing
    #[arg(long, env = "JWE_ENVELOPE_KEEP_PROTECTED", default_value = "false")]
    keep_protected: bool,

    /// Log level
    #[arg(long, env = "JWE_ENVELOPE_LOG_LEVEL", value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the shape, headers and component lengths as JSON
    Inspect,
    /// Re-serialize in compact form
    Compact,
    /// Re-serialize in JSON form
    Json,
    /// Print the additional authenticated data
    Aad,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn setup_logging(log_level: LogLevel) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(Level::from(log_level).into());
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn summary(envelope: &Envelope) -> Value {
    let recipients: Vec<Value> = envelope
        .recipients()
        .iter()
        .map(|recipient| {
            json!({
                "header": recipient.header(),
                "merged_header": envelope.merged_header(Some(recipient)),
                "encrypted_key_len": recipient.encrypted_key().len(),
            })
        })
        .collect();

    json!({
        "shape": envelope.shape().to_string(),
        "compact_eligible": envelope.is_compact_eligible(),
        "protected": envelope.protected_header(),
        "unprotected": envelope.unprotected_header(),
        "recipients": recipients,
        "aad_len": envelope.aad().map(<[u8]>::len),
        "iv_len": envelope.iv().len(),
        "ciphertext_len": envelope.ciphertext().len(),
        "tag_len": envelope.tag().len(),
    })
}

fn run(args: &Args) -> Result<String> {
    let input = read_input(args.input.as_ref())?;
    let parse_options = ParseOptions {
        max_input_len: args.max_input_len,
    };
    let serialize_options = SerializeOptions {
        reuse_original_protected: args.keep_protected,
    };

    let envelope = parse_with(&input, &parse_options).context("Failed to parse envelope")?;
    debug!(shape = %envelope.shape(), "parsed input");

    let output = match args.command {
        Command::Inspect => serde_json::to_string_pretty(&summary(&envelope))?,
        Command::Compact => envelope
            .to_compact_with(&serialize_options)
            .context("Envelope has no compact form")?,
        Command::Json => envelope.to_full_json_with(&serialize_options),
        Command::Aad => String::from_utf8(envelope.compute_aad())
            .context("AAD is not valid UTF-8")?,
    };

    Ok(output)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level)?;

    println!("{}", run(&args)?);

    Ok(())
}
