//! Local config import handler.

use updater_core::{ImportFile, Session};

use crate::cli::ImportArgs;
use crate::error::CliError;
use crate::output::{self, Output};

pub async fn handle(session: &Session, args: ImportArgs, out: &Output) -> Result<(), CliError> {
    let mut file = ImportFile::read(&args.file).await?;
    if let Some(name) = args.name {
        file.file_name = name;
    }
    if file.bytes.is_empty() {
        return Err(CliError::Validation {
            field: "FILE".into(),
            reason: format!("{} is empty", args.file.display()),
        });
    }
    tracing::info!(file = %file.file_name, bytes = file.bytes.len(), "uploading configuration");

    let tasks = session.tasks();
    let result = output::with_spinner(
        out,
        tasks.subscribe(),
        "Importing configuration",
        tasks.import_local(file),
    )
    .await;

    if !result.success {
        return Err(CliError::action("import", result.message));
    }
    out.note(&format!("{} {}", out.badge(true), result.message));
    Ok(())
}
