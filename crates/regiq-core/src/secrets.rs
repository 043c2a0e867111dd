use std::collections::BTreeMap;
use std::env;

use crate::SourceType;

/// Injectable API-key lookup.
///
/// Keys are optional everywhere: a `None` simply means the request goes out
/// unauthenticated, which every currently supported source accepts.
pub trait ApiKeyProvider: Send + Sync {
    fn api_key(&self, source: SourceType) -> Option<String>;
}

/// Default provider: no keys configured.
#[derive(Debug, Default)]
pub struct NoKeys;

impl ApiKeyProvider for NoKeys {
    fn api_key(&self, _source: SourceType) -> Option<String> {
        None
    }
}

/// Reads `REGIQ_<SOURCE>_API_KEY` from the process environment
/// (e.g. `REGIQ_FDA_API_KEY`, `REGIQ_REGULATIONS_GOV_API_KEY`).
#[derive(Debug, Default)]
pub struct EnvKeyProvider;

impl ApiKeyProvider for EnvKeyProvider {
    fn api_key(&self, source: SourceType) -> Option<String> {
        env::var(format!("REGIQ_{}_API_KEY", source.as_str()))
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Fixed in-memory key map, useful for tests and embedded deployments.
#[derive(Debug, Default)]
pub struct StaticKeys {
    keys: BTreeMap<SourceType, String>,
}

impl StaticKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, source: SourceType, key: impl Into<String>) -> Self {
        self.keys.insert(source, key.into());
        self
    }
}

impl ApiKeyProvider for StaticKeys {
    fn api_key(&self, source: SourceType) -> Option<String> {
        self.keys.get(&source).cloned()
    }
}
