//! Liveness probe handler.

use updater_core::{HealthStatus, Session};

use crate::error::CliError;
use crate::output::{self, Output};

pub async fn handle(session: &Session, out: &Output) -> Result<(), CliError> {
    let health = session.health().await?;

    let rendered = output::render_single(
        out.format,
        &health,
        |h: &HealthStatus| {
            format!(
                "{} {}  {}",
                out.badge(h.is_ok()),
                h.status,
                out.dim(session.client().base_url().as_str())
            )
        },
        |h| h.status.clone(),
    )?;
    out.print(&rendered);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            status: health.status,
        })
    }
}
