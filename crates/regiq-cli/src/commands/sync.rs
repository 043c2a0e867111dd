use serde::Serialize;

use regiq_core::{SourceAdapterRegistry, SourceFilter, SourceResult, SourceType};

use crate::cli::SyncArgs;
use crate::error::CliError;

use super::CommandOutcome;

#[derive(Debug, Serialize)]
struct SyncSummary {
    sources_polled: usize,
    sources_failed: usize,
    alerts_fetched: usize,
}

#[derive(Debug, Serialize)]
struct SyncResponseData {
    summary: SyncSummary,
    results: Vec<SourceResult>,
}

pub async fn run(
    args: &SyncArgs,
    registry: &SourceAdapterRegistry,
) -> Result<CommandOutcome, CliError> {
    let sources: Vec<SourceType> = if args.all {
        registry.get_available_sources()
    } else {
        SourceType::LIVE.to_vec()
    };

    let filters = sources
        .into_iter()
        .map(|source| {
            let mut filter = SourceFilter::new(source);
            if let Some(query) = &args.query {
                filter = filter.with_text("query", query.clone());
            }
            filter
        })
        .collect();

    let results = registry.execute_multiple_queries(filters).await;

    let summary = SyncSummary {
        sources_polled: results.len(),
        sources_failed: results.iter().filter(|r| !r.success).count(),
        alerts_fetched: results.iter().map(|r| r.data.len()).sum(),
    };
    let any_failed = summary.sources_failed > 0;

    let data = serde_json::to_value(SyncResponseData { summary, results })?;
    Ok(CommandOutcome::ok(data).with_failures(any_failed))
}
