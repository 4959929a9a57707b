//! Task history handler.

use tabled::Tabled;

use updater_core::{Session, TaskHistory};

use crate::cli::{HistoryArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Output};

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub async fn handle(session: &Session, args: HistoryArgs, out: &Output) -> Result<(), CliError> {
    let store = session.history();
    output::with_spinner(out, store.subscribe(), "Loading task history", store.fetch_history())
        .await;

    let state = store.state();
    if let Some(message) = state.error {
        return Err(CliError::from_store(message));
    }

    let entries = select(state.data, args.failed, args.limit);
    if entries.is_empty() && out.format == OutputFormat::Table {
        out.note("No task history recorded yet.");
        return Ok(());
    }

    let rendered = output::render_list(
        out.format,
        &entries,
        |h| HistoryRow {
            time: display_time(h),
            task: h.task.clone(),
            result: out.badge(h.success),
            message: h.message.clone(),
        },
        |h| {
            let result = if h.success { "ok" } else { "failed" };
            format!("{}\t{}\t{result}\t{}", h.timestamp, h.task, h.message)
        },
    )?;
    out.print(&rendered);
    Ok(())
}

/// Newest first, optionally only failures, capped at `limit`.
///
/// The service appends entries, so the list arrives oldest first.
fn select(mut entries: Vec<TaskHistory>, failed_only: bool, limit: Option<usize>) -> Vec<TaskHistory> {
    entries.reverse();
    if failed_only {
        entries.retain(|h| !h.success);
    }
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

fn display_time(entry: &TaskHistory) -> String {
    entry.parsed_timestamp().map_or_else(
        || entry.timestamp.clone(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}
