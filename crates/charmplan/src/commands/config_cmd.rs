//! Config subcommand handlers.

use charmplan_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::{CliError, exit_code};
use crate::output::{self, Printer};

fn format_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render config: {e}"))
}

pub fn handle(args: &ConfigArgs, printer: &Printer) -> Result<i32, CliError> {
    match args.command {
        // Strict load: a malformed config file is an error here.
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(printer.format, &cfg, format_toml, format_toml)?;
            printer.print(&out);
        }

        ConfigCommand::Path => {
            printer.print(&config::config_path().display().to_string());
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            printer.status(&format!("Wrote default configuration to {}", path.display()));
        }
    }
    Ok(exit_code::SUCCESS)
}
