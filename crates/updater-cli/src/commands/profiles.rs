//! Local connection profile handlers.

use serde::Serialize;
use tabled::Tabled;

use updater_config::Profile;

use crate::cli::{OutputFormat, ProfilesCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Output};

use super::util;

#[derive(Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    default: bool,
    #[serde(flatten)]
    profile: &'a Profile,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Timeout")]
    timeout: String,
}

pub fn handle(cmd: ProfilesCommand, out: &Output, yes: bool) -> Result<(), CliError> {
    match cmd {
        ProfilesCommand::List => {
            let cfg = config::load_config()?;
            if cfg.profiles.is_empty() && out.format == OutputFormat::Table {
                out.note(&format!(
                    "No profiles configured; using {}. Add one with: mihomo-updater profiles add <name> --url <URL>",
                    updater_config::DEFAULT_SERVER
                ));
                return Ok(());
            }
            let default = cfg.active_profile_name(None);
            let views: Vec<ProfileView<'_>> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| ProfileView {
                    name,
                    default: *name == default,
                    profile,
                })
                .collect();

            let rendered = output::render_list(
                out.format,
                &views,
                |v| ProfileRow {
                    marker: if v.default { "*" } else { "" },
                    name: v.name.to_owned(),
                    server: v.profile.server.clone(),
                    timeout: v
                        .profile
                        .timeout_ms
                        .map_or_else(|| "-".into(), |ms| format!("{ms} ms")),
                },
                |v| {
                    let marker = if v.default { " *" } else { "" };
                    format!("{}{marker}", v.name)
                },
            )?;
            out.print(&rendered);
            Ok(())
        }

        ProfilesCommand::Add {
            name,
            url,
            timeout,
            default,
        } => {
            config::validate_server(&url)?;
            if timeout == Some(0) {
                return Err(CliError::Validation {
                    field: "timeout".into(),
                    reason: "must be greater than zero".into(),
                });
            }

            let mut cfg = config::load_config()?;
            let replaced = cfg
                .profiles
                .insert(
                    name.clone(),
                    Profile {
                        server: url,
                        timeout_ms: timeout,
                    },
                )
                .is_some();
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;

            let verb = if replaced { "Updated" } else { "Added" };
            out.note(&format!("{} {verb} profile '{name}'", out.badge(true)));
            Ok(())
        }

        ProfilesCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            ensure_exists(&cfg, &name)?;
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            out.note(&format!("{} Default profile set to '{name}'", out.badge(true)));
            Ok(())
        }

        ProfilesCommand::Remove { name } => {
            let mut cfg = config::load_config()?;
            ensure_exists(&cfg, &name)?;
            if !util::confirm(&format!("Remove profile '{name}'?"), yes)? {
                return Ok(());
            }
            cfg.profiles.remove(&name);
            if cfg.default_profile.as_deref() == Some(name.as_str()) {
                cfg.default_profile = None;
            }
            config::save_config(&cfg)?;
            out.note(&format!("{} Removed profile '{name}'", out.badge(true)));
            Ok(())
        }
    }
}

fn ensure_exists(cfg: &Config, name: &str) -> Result<(), CliError> {
    if cfg.profiles.contains_key(name) {
        Ok(())
    } else {
        Err(CliError::ProfileNotFound {
            name: name.into(),
            available: config::available_profiles(cfg),
        })
    }
}
