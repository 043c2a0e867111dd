use serde::Serialize;

use regiq_core::{SourceAdapterRegistry, SourceFilter, SourceResult, SourceType};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandOutcome;

#[derive(Debug, Serialize)]
struct SearchResponseData {
    result: SourceResult,
}

pub async fn run(
    args: &SearchArgs,
    registry: &SourceAdapterRegistry,
) -> Result<CommandOutcome, CliError> {
    let source: SourceType = args.source.parse()?;
    let filter = build_filter(source, args);

    let result = registry.execute_query(&filter).await;
    let any_failed = !result.success;

    let data = serde_json::to_value(SearchResponseData { result })?;
    Ok(CommandOutcome::ok(data).with_failures(any_failed))
}

fn build_filter(source: SourceType, args: &SearchArgs) -> SourceFilter {
    let mut filter = SourceFilter::new(source);

    if let Some(query) = &args.query {
        filter = filter.with_text("query", query.clone());
    }
    if let Some(state) = &args.state {
        filter = filter.with_text("state", state.clone());
    }
    if let Some(classification) = &args.classification {
        filter = filter.with_text("classification", classification.clone());
    }
    if args.from.is_some() || args.to.is_some() {
        filter = filter.with_date_range("date_range", args.from.clone(), args.to.clone());
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: Option<&str>, from: Option<&str>) -> SearchArgs {
        SearchArgs {
            source: "fda".to_string(),
            query: query.map(str::to_string),
            state: None,
            classification: None,
            from: from.map(str::to_string),
            to: None,
        }
    }

    #[test]
    fn build_filter_maps_flags_to_filter_keys() {
        let filter = build_filter(SourceType::Fda, &args(Some("listeria"), Some("2024-01-01")));

        assert_eq!(filter.text("query"), Some("listeria"));
        assert_eq!(
            filter.date_range("date_range"),
            Some((Some("2024-01-01"), None))
        );
    }

    #[test]
    fn build_filter_skips_absent_flags() {
        let filter = build_filter(SourceType::Fda, &args(None, None));

        assert!(filter.text("query").is_none());
        assert!(filter.date_range("date_range").is_none());
    }
}
