//! Service configuration handlers.

use std::str::FromStr;

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use updater_core::{ConfigKey, ConfigPatch, Session};

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Output};

use super::util;

#[derive(Clone, Serialize, Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn handle(session: &Session, args: ConfigArgs, out: &Output) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show { key } => show(session, key.as_deref(), out).await,

        ConfigCommand::Set { pairs } => {
            let mut patch = ConfigPatch::new();
            for raw in &pairs {
                let (key, value) = util::parse_assignment(raw)?;
                patch.insert(key, value);
            }
            save(session, &patch, out).await
        }

        ConfigCommand::Apply { from_file } => {
            let patch = ConfigPatch::from(util::read_json_object(&from_file)?);
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "from-file".into(),
                    reason: "the JSON object has no keys".into(),
                });
            }
            save(session, &patch, out).await
        }
    }
}

async fn show(session: &Session, key: Option<&str>, out: &Output) -> Result<(), CliError> {
    let store = session.config();
    output::with_spinner(out, store.subscribe(), "Loading configuration", store.fetch_config())
        .await;

    let state = store.state();
    if let Some(message) = state.error {
        return Err(CliError::from_store(message));
    }
    let config = state.data;

    let rendered = if let Some(key) = key {
        let value = config
            .get(key)
            .ok_or_else(|| CliError::KeyNotFound { key: key.into() })?;
        output::render_single(out.format, value, output::display_value, output::display_value)?
    } else {
        match out.format {
            OutputFormat::Table | OutputFormat::Plain => {
                let mut rows: Vec<ConfigRow> = config
                    .iter()
                    .map(|(key, value)| ConfigRow {
                        key: key.clone(),
                        value: output::display_value(value),
                    })
                    .collect();
                rows.sort_by(|a, b| a.key.cmp(&b.key));
                output::render_list(out.format, &rows, Clone::clone, |r| {
                    format!("{}={}", r.key, r.value)
                })?
            }
            format => output::render_single(format, &config, |_| String::new(), |_| String::new())?,
        }
    };
    out.print(&rendered);
    Ok(())
}

async fn save(session: &Session, patch: &ConfigPatch, out: &Output) -> Result<(), CliError> {
    for key in patch.keys() {
        if ConfigKey::from_str(key).is_err() {
            warn!(%key, "not a known configuration key, sending it anyway");
        }
    }

    let store = session.config();
    let result = output::with_spinner(
        out,
        store.subscribe(),
        "Saving configuration",
        store.save_config(patch),
    )
    .await;

    if !result.success {
        return Err(CliError::action("configuration update", result.message));
    }
    out.note(&format!("{} {}", out.badge(true), result.message));
    Ok(())
}
