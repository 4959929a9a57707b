//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one record per line.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use updater_core::StoreWatch;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Resolved output settings ─────────────────────────────────────────

/// Presentation settings shared by every command handler.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, color: ColorMode, quiet: bool) -> Self {
        Self {
            format,
            color: should_color(color),
            quiet,
        }
    }

    /// Print rendered output to stdout, respecting quiet mode.
    pub fn print(&self, rendered: &str) {
        print_output(rendered, self.quiet);
    }

    /// Status line on stderr, suppressed by `--quiet`.
    pub fn note(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Green check or red cross, depending on the color setting.
    pub fn badge(&self, success: bool) -> String {
        match (success, self.color) {
            (true, true) => "✓ ok".green().to_string(),
            (false, true) => "✗ failed".red().to_string(),
            (true, false) => "ok".into(),
            (false, false) => "failed".into(),
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_owned()
        }
    }

    fn spinner_enabled(&self) -> bool {
        !self.quiet && io::stderr().is_terminal()
    }
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Loading indicator ────────────────────────────────────────────────

/// Drive `operation` to completion, spinning while the watched store
/// reports `loading`.
pub async fn with_spinner<T, F>(
    out: &Output,
    mut watch: StoreWatch<T>,
    message: &str,
    operation: F,
) -> F::Output
where
    T: Clone + Send + Sync + 'static,
    F: Future,
{
    if !out.spinner_enabled() {
        return operation.await;
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());

    let mut operation = std::pin::pin!(operation);
    loop {
        tokio::select! {
            result = &mut operation => {
                bar.finish_and_clear();
                return result;
            }
            Some(state) = watch.changed() => {
                if state.loading {
                    bar.enable_steady_tick(Duration::from_millis(80));
                } else {
                    bar.disable_steady_tick();
                }
            }
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// - `table`: maps each item through `to_row` and builds a rounded table
/// - `json` / `json-compact` / `yaml`: serializes the original data
/// - `plain`: calls `line_fn` on each item to emit one line per item
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(line_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are not
/// row-shaped.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Render a JSON value for humans: strings bare, everything else as JSON.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    Ok(rendered?)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
