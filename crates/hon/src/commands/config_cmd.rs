//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::Context;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // Works even when the file itself fails to load.
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(hon_config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let ctx = Context::load(global)?;
            ctx.config.coordinator_config()?;
            ctx.config.capability_table()?;

            let out = output::render_single(ctx.output, &ctx.config, |cfg| Ok(cfg.to_toml()?))?;
            output::print_output(out.trim_end(), ctx.quiet);
            Ok(())
        }
    }
}
