//! Configuration for the fixrec command-line tool.
//!
//! Command-line arguments are parsed with clap, then resolved into a
//! [`Config`]: layouts parsed, positional values typed against their fields,
//! and the sample seed fixed (explicit or time-derived). The resolved config
//! can be printed so runs are reproducible.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fixrec_core::{FieldSpec, RecordLayout, Value};

/// Layout of the classic example record: int32, 4-byte string, int16.
pub const DEMO_LAYOUT: &str = ">i4sh";

/// Default file the demo writes and reads back.
pub const DEMO_FILE: &str = "test.bin";

#[derive(Parser, Debug)]
#[command(name = "fixrec", version, about = "Pack and unpack fixed-layout binary records")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the resolved configuration before running.
    #[arg(long, global = true)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack (7, b"spam", 8) as >i4sh, write it, read it back and unpack it.
    Demo {
        /// File to write the record to.
        #[arg(short, long, default_value = DEMO_FILE)]
        out: PathBuf,
    },
    /// Encode values against a layout and write the record to a file.
    Pack {
        /// Layout notation, for example `>i4sh`.
        #[arg(short, long)]
        layout: RecordLayout,

        /// Output file.
        #[arg(short, long)]
        out: PathBuf,

        /// One value per field. Integers in decimal; byte strings as text,
        /// or hex when prefixed with `0x`.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },
    /// Read a record file and decode it against a layout.
    Unpack {
        /// Layout notation, for example `>i4sh`.
        #[arg(short, long)]
        layout: RecordLayout,

        /// Input file holding exactly one record.
        #[arg(short = 'i', long = "in")]
        input: PathBuf,
    },
    /// Generate random values that fit a layout and encode them.
    Sample {
        /// Layout notation, for example `>i4sh`.
        #[arg(short, long)]
        layout: RecordLayout,

        /// Random seed for determinism (default: time-based).
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the record to this file.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// What to do, with every input resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Demo {
        out: PathBuf,
    },
    Pack {
        layout: RecordLayout,
        values: Vec<Value>,
        out: PathBuf,
    },
    Unpack {
        layout: RecordLayout,
        input: PathBuf,
    },
    Sample {
        layout: RecordLayout,
        seed: u64,
        out: Option<PathBuf>,
    },
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub action: Action,

    /// Number of `-v` flags
    pub verbosity: u8,

    /// Whether to print the resolved config
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed arguments into a runnable configuration.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let action = match cli.command {
            Command::Demo { out } => Action::Demo { out },
            Command::Pack {
                layout,
                out,
                values,
            } => {
                let values = parse_values(&layout, &values)?;
                Action::Pack {
                    layout,
                    values,
                    out,
                }
            }
            Command::Unpack { layout, input } => Action::Unpack { layout, input },
            Command::Sample { layout, seed, out } => Action::Sample {
                layout,
                seed: seed.unwrap_or_else(time_seed),
                out,
            },
        };

        Ok(Self {
            action,
            verbosity: cli.verbose,
            print_config: cli.print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.action {
            Action::Demo { out } => {
                println!("Command: demo");
                println!("Layout:  {DEMO_LAYOUT}");
                println!("Output:  {}", out.display());
            }
            Action::Pack {
                layout,
                values,
                out,
            } => {
                println!("Command: pack");
                println!("Layout:  {layout} ({} bytes)", layout.width());
                println!("Values:  {}", fixrec_core::value::format_values(values));
                println!("Output:  {}", out.display());
            }
            Action::Unpack { layout, input } => {
                println!("Command: unpack");
                println!("Layout:  {layout} ({} bytes)", layout.width());
                println!("Input:   {}", input.display());
            }
            Action::Sample { layout, seed, out } => {
                println!("Command: sample");
                println!("Layout:  {layout} ({} bytes)", layout.width());
                println!("Seed:    {seed}");
                match out {
                    Some(path) => println!("Output:  {}", path.display()),
                    None => println!("Output:  (stdout only)"),
                }
            }
        }
        println!("Verbosity: {}", self.verbosity);
        println!();
    }
}

/// Type each positional argument against the field it lands in.
///
/// Surplus arguments are kept (as integers when they look like one) so the
/// encoder can report the arity mismatch itself.
pub fn parse_values(layout: &RecordLayout, raw: &[String]) -> Result<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(index, arg)| match layout.fields().get(index) {
            Some(field) => parse_value(field, arg)
                .with_context(|| format!("invalid value {arg:?} for field {index}")),
            None => Ok(arg
                .parse::<i64>()
                .map(Value::Int)
                .unwrap_or_else(|_| Value::from(arg.as_str()))),
        })
        .collect()
}

/// Parse one argument for a field.
pub fn parse_value(field: &FieldSpec, raw: &str) -> Result<Value> {
    if field.kind().is_int() {
        let n = raw
            .parse::<i64>()
            .with_context(|| format!("expected an integer for {} field", field.kind()))?;
        return Ok(Value::Int(n));
    }

    match raw.strip_prefix("0x") {
        Some(digits) => {
            let bytes = hex::decode(digits).context("invalid hex byte string")?;
            Ok(Value::Bytes(bytes))
        }
        None => Ok(Value::from(raw)),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or_default()
}
