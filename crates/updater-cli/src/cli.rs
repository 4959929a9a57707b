//! Clap derive structures for the `mihomo-updater` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mihomo-updater -- client for the Mihomo auto-update service
#[derive(Debug, Parser)]
#[command(
    name = "mihomo-updater",
    version,
    about = "Control a Mihomo auto-update service from the command line",
    long_about = "Inspect and edit the update service configuration, review task\n\
        history, trigger Mihomo and GeoIP updates, and import local config files.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "MIHOMO_UPDATER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, short = 's', env = "MIHOMO_UPDATER_SERVER", global = true)]
    pub server: Option<String>,

    /// Request timeout in milliseconds (overrides profile)
    #[arg(long, env = "MIHOMO_UPDATER_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "MIHOMO_UPDATER_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one record per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and edit the service configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Show the task execution history
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Trigger an update task now
    #[command(alias = "up")]
    Update(UpdateArgs),

    /// Upload a local file as the Mihomo configuration
    Import(ImportArgs),

    /// View or change the theme preference
    Theme(ThemeArgs),

    /// Check that the service is alive
    Health,

    /// Manage local connection profiles
    Profiles(ProfilesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the current service configuration
    Show {
        /// Only print the value of this key
        #[arg(long, short = 'k')]
        key: Option<String>,
    },

    /// Set one or more configuration values
    ///
    /// Values are parsed as JSON when possible, otherwise sent as strings:
    /// `fetch_interval=3600` sends a number, `fetch_url=https://...` a string.
    Set {
        /// Assignments in KEY=VALUE form
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },

    /// Apply a JSON object of configuration changes from a file
    Apply {
        /// Path to a JSON file containing an object of changes
        #[arg(long = "from-file", short = 'F', value_name = "PATH")]
        from_file: PathBuf,
    },
}

// ── History ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Show at most this many of the most recent entries
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Only show failed tasks
    #[arg(long)]
    pub failed: bool,
}

// ── Update ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(subcommand)]
    pub command: UpdateCommand,
}

#[derive(Debug, Subcommand)]
pub enum UpdateCommand {
    /// Re-fetch the Mihomo configuration from its subscription URL
    Mihomo,

    /// Refresh the GeoIP and GeoSite databases
    #[command(alias = "geo")]
    Geoip,
}

// ── Import ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Local configuration file to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// File name reported to the service (defaults to the local name)
    #[arg(long)]
    pub name: Option<String>,
}

// ── Theme ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the stored theme mode
    Show,

    /// Store a new theme mode
    Set {
        /// Theme mode
        #[arg(value_enum)]
        mode: ThemeChoice,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    /// Follow the system setting
    Auto,
    /// Always dark
    #[value(name = "true", alias = "dark")]
    Dark,
    /// Always light
    #[value(name = "false", alias = "light")]
    Light,
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List configured profiles
    #[command(alias = "ls")]
    List,

    /// Add or replace a profile
    Add {
        /// Profile name
        name: String,

        /// Service base URL, e.g. http://192.168.1.2:5000
        #[arg(long = "url", value_name = "URL")]
        url: String,

        /// Request timeout in milliseconds
        #[arg(long = "timeout", value_name = "MS")]
        timeout: Option<u64>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Delete a profile
    #[command(alias = "rm")]
    Remove {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
