use serde::Serialize;

use regiq_core::{SourceAdapterRegistry, SourceType};

use crate::cli::SourcesArgs;
use crate::error::CliError;

use super::CommandOutcome;

#[derive(Debug, Serialize)]
struct SourceStatus {
    id: SourceType,
    live: bool,
    available: bool,
    circuit_open: bool,
    failures: u32,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    sources: Vec<SourceStatus>,
}

pub fn run(
    args: &SourcesArgs,
    registry: &SourceAdapterRegistry,
) -> Result<CommandOutcome, CliError> {
    let health = registry.get_source_health();

    let sources = health
        .into_iter()
        .filter(|(source, _)| !args.live_only || source.is_live())
        .map(|(source, health)| SourceStatus {
            id: source,
            live: source.is_live(),
            available: health.available,
            circuit_open: health.circuit_open,
            failures: health.failures,
        })
        .collect::<Vec<_>>();

    let data = serde_json::to_value(SourcesResponseData { sources })?;
    Ok(CommandOutcome::ok(data))
}
