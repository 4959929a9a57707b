mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use updater_core::ThemeStore;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
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

async fn run(cli: Cli) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let out = Output::new(
        config::output_format(&cli.global, &cfg),
        config::color_mode(&cli.global, &cfg),
        cli.global.quiet,
    );

    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mihomo-updater", &mut std::io::stdout());
            Ok(())
        }

        // Profiles and theme never touch the service
        Command::Profiles(args) => commands::profiles::handle(args.command, &out, cli.global.yes),
        Command::Theme(args) => {
            let store = ThemeStore::new(config::file_preferences());
            commands::theme::handle(&store, args, &out)
        }

        cmd => {
            let session = config::build_session(&cli.global, &cfg)?;
            tracing::debug!(command = ?cmd, server = %session.client().base_url(), "dispatching command");
            commands::dispatch(cmd, &session, &out).await
        }
    }
}
