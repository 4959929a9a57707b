//! Command dispatch: bridges CLI args -> core stores -> output formatting.

pub mod config_cmd;
pub mod health;
pub mod history;
pub mod import;
pub mod profiles;
pub mod theme;
pub mod update;
pub mod util;

use updater_core::Session;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::Output;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, out: &Output) -> Result<(), CliError> {
    match cmd {
        Command::Config(args) => config_cmd::handle(session, args, out).await,
        Command::History(args) => history::handle(session, args, out).await,
        Command::Update(args) => update::handle(session, args, out).await,
        Command::Import(args) => import::handle(session, args, out).await,
        Command::Health => health::handle(session, out).await,
        // Local commands are handled before a session is built
        Command::Theme(_) | Command::Profiles(_) | Command::Completions(_) => unreachable!(),
    }
}
