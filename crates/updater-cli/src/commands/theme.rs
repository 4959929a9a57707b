//! Theme preference handlers. Local only, no service connection.

use serde::Serialize;

use updater_core::{ThemeMode, ThemeStore};

use crate::cli::{ThemeArgs, ThemeChoice, ThemeCommand};
use crate::error::CliError;
use crate::output::{self, Output};

#[derive(Serialize)]
struct ThemeView {
    mode: ThemeMode,
}

pub fn handle(store: &ThemeStore, args: ThemeArgs, out: &Output) -> Result<(), CliError> {
    match args.command {
        ThemeCommand::Show => {
            let view = ThemeView {
                mode: store.is_dark_mode(),
            };
            let rendered = output::render_single(
                out.format,
                &view,
                |v| format!("Theme mode: {}", describe(v.mode)),
                |v| v.mode.to_string(),
            )?;
            out.print(&rendered);
            Ok(())
        }

        ThemeCommand::Set { mode } => {
            let mode = theme_mode(mode);
            store.set_theme(mode);
            out.note(&format!("{} Theme mode set to {}", out.badge(true), describe(mode)));
            Ok(())
        }
    }
}

fn theme_mode(choice: ThemeChoice) -> ThemeMode {
    match choice {
        ThemeChoice::Auto => ThemeMode::Auto,
        ThemeChoice::Dark => ThemeMode::Dark,
        ThemeChoice::Light => ThemeMode::Light,
    }
}

fn describe(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Auto => "auto (follow system)",
        ThemeMode::Dark => "dark",
        ThemeMode::Light => "light",
    }
}
