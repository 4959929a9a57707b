//! Update trigger handlers.

use updater_core::Session;

use crate::cli::{UpdateArgs, UpdateCommand};
use crate::error::CliError;
use crate::output::{self, Output};

pub async fn handle(session: &Session, args: UpdateArgs, out: &Output) -> Result<(), CliError> {
    let tasks = session.tasks();
    let (action, result) = match args.command {
        UpdateCommand::Mihomo => (
            "mihomo update",
            output::with_spinner(
                out,
                tasks.subscribe(),
                "Updating Mihomo configuration",
                tasks.update_mihomo(),
            )
            .await,
        ),
        UpdateCommand::Geoip => (
            "geoip update",
            output::with_spinner(
                out,
                tasks.subscribe(),
                "Updating GeoIP databases",
                tasks.update_geoip(),
            )
            .await,
        ),
    };

    if !result.success {
        return Err(CliError::action(action, result.message));
    }
    out.note(&format!("{} {}", out.badge(true), result.message));
    Ok(())
}
