//! Clap derive structures for the `hon` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hon -- inspect hOn appliance switch capabilities
#[derive(Debug, Parser)]
#[command(
    name = "hon",
    version,
    about = "Inspect hOn appliance switch capabilities",
    long_about = "Lists the capability tables used to build appliance switches and\n\
        resolves them against appliance state dumps (JSON fixtures).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config path)
    #[arg(long, env = "HON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides `defaults.output` from the config file)
    #[arg(long, short = 'o', env = "HON_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List capability tables per appliance type
    #[command(alias = "caps")]
    Capabilities(CapabilitiesArgs),

    /// Resolve switches for appliance state fixtures
    #[command(alias = "sw")]
    Switches(SwitchesArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Capabilities ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CapabilitiesArgs {
    /// Only show this appliance type (e.g. WM, TD, WD, DW)
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub appliance_type: Option<String>,
}

// ── Switches ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchesArgs {
    /// Appliance fixture files (JSON with `info` and `state`)
    #[arg(required = true, value_name = "FIXTURE")]
    pub fixtures: Vec<PathBuf>,

    /// Switch on the capability with this key before reporting
    #[arg(long = "on", value_name = "KEY")]
    pub turn_on: Vec<String>,

    /// Switch off the capability with this key before reporting
    #[arg(long = "off", value_name = "KEY")]
    pub turn_off: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
