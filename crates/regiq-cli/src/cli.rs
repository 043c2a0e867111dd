//! CLI argument definitions for RegIQ.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Query one source with filters |
//! | `sync` | Poll every live source in one batched run |
//! | `sources` | Show the source availability and breaker matrix |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Offline transport, no real network calls |

use clap::{Args, Parser, Subcommand};

/// RegIQ - regulatory alert ingestion CLI
///
/// Query government data sources (FDA, USDA, FSIS, WHO) and normalize the
/// responses into canonical alert records.
#[derive(Debug, Parser)]
#[command(
    name = "regiq",
    author,
    version,
    about = "Regulatory alert ingestion CLI"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use the offline no-op transport instead of real network calls.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Per-request timeout in milliseconds, overriding every source's
    /// configured deadline.
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query a single source with filters.
    ///
    /// # Examples
    ///
    ///   regiq search fda --query listeria
    ///   regiq search usda --query "ground beef" --from 2024-01-01
    Search(SearchArgs),

    /// Poll sources in one batched run (five queries at a time).
    ///
    /// # Examples
    ///
    ///   regiq sync
    ///   regiq sync --all --query salmonella
    Sync(SyncArgs),

    /// Show every configured source with breaker state and failure counts.
    Sources(SourcesArgs),
}

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Source identifier (e.g. fda, usda, fsis, who).
    pub source: String,

    /// Free-text query.
    #[arg(long)]
    pub query: Option<String>,

    /// Two-letter state code filter.
    #[arg(long)]
    pub state: Option<String>,

    /// Recall classification filter (FDA).
    #[arg(long)]
    pub classification: Option<String>,

    /// Lower publication-date bound (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Upper publication-date bound (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for the `sync` command.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Include placeholder sources, not just the live ones.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Free-text query applied to every polled source.
    #[arg(long)]
    pub query: Option<String>,
}

/// Arguments for the `sources` command.
#[derive(Debug, Args)]
pub struct SourcesArgs {
    /// Only show sources with a live backend.
    #[arg(long, default_value_t = false)]
    pub live_only: bool,
}
