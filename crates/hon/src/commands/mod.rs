//! Command dispatch: bridges CLI args -> core -> output formatting.

pub mod capabilities;
pub mod config_cmd;
pub mod switches;

use clap::ValueEnum;

use hon_config::Config;

use crate::cli::{ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Loaded configuration plus the output settings resolved against it.
pub struct Context {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    /// Load config (explicit `--config` file or the platform path) and
    /// resolve output flags, falling back to `[defaults]`.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = match &global.config {
            Some(path) => hon_config::load_config_from(path)?,
            None => hon_config::load_config()?,
        };

        let output = match global.output {
            Some(format) => format,
            None => parse_default("defaults.output", &config.defaults.output)?,
        };
        let color = match global.color {
            Some(mode) => mode,
            None => parse_default::<ColorMode>("defaults.color", &config.defaults.color)?,
        };

        Ok(Self {
            config,
            output,
            color: output::should_color(color),
            quiet: global.quiet,
        })
    }
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Dispatch a capability command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Capabilities(args) => capabilities::handle(&args, ctx),
        Command::Switches(args) => switches::handle(args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
