mod search;
mod sources;
mod sync;

use std::time::Duration;

use regiq_core::{RegistryBuilder, SourceAdapterRegistry};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Payload plus the one bit the process exit code needs.
pub struct CommandOutcome {
    pub data: Value,
    pub any_failed: bool,
}

impl CommandOutcome {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            any_failed: false,
        }
    }

    pub fn with_failures(mut self, any_failed: bool) -> Self {
        self.any_failed = any_failed;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutcome, CliError> {
    let registry = build_registry(cli);

    match &cli.command {
        Command::Search(args) => search::run(args, &registry).await,
        Command::Sync(args) => sync::run(args, &registry).await,
        Command::Sources(args) => sources::run(args, &registry),
    }
}

fn build_registry(cli: &Cli) -> SourceAdapterRegistry {
    let mut builder = RegistryBuilder::new();
    if let Some(ms) = cli.timeout_ms {
        builder = builder.with_timeout(Duration::from_millis(ms));
    }
    if cli.mock {
        // Default builder transport is the offline no-op client.
        builder.build()
    } else {
        builder.with_reqwest_client().with_env_keys().build()
    }
}
