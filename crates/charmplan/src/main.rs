mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use charmplan_config::{self as config, Config};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Printer;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    match &cli.command {
        // Config commands must work even when the config file itself is broken
        Command::Config(args) => {
            let printer = Printer::resolve(&cli.global, &Config::default())?;
            commands::config_cmd::handle(args, &printer)
        }

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "charmplan", &mut std::io::stdout());
            Ok(error::exit_code::SUCCESS)
        }

        Command::Plan(args) => {
            let printer = Printer::resolve(&cli.global, &config::load_config_or_default())?;
            tracing::debug!(command = ?args, "dispatching plan");
            commands::plan::handle(args, &printer)
        }

        Command::Refresh(args) => {
            let printer = Printer::resolve(&cli.global, &config::load_config_or_default())?;
            tracing::debug!(command = ?args, "dispatching refresh");
            commands::refresh::handle(args, &printer)
        }
    }
}
