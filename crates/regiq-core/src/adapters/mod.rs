//! Per-source adapters: FDA, USDA, FSIS, WHO, and the placeholder family.

mod fda;
mod fsis;
mod placeholder;
mod usda;
mod who;

pub use fda::FdaAdapter;
pub use fsis::FsisAdapter;
pub use placeholder::PlaceholderAdapter;
pub use usda::UsdaAdapter;
pub use who::WhoAdapter;

/// Fixed page size every adapter requests.
pub(crate) const PAGE_SIZE: u32 = 50;

/// Descriptive User-Agent sent on every outbound request.
pub(crate) const USER_AGENT: &str = "RegIQ/0.1 (regulatory alert ingestion)";

/// Best-effort ISO-8601 date normalization. Compact `YYYYMMDD` dates (the
/// openFDA convention) gain separators; anything else already carrying
/// separators passes through untouched.
pub(crate) fn normalize_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 8 && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Some(format!(
            "{}-{}-{}",
            &trimmed[0..4],
            &trimmed[4..6],
            &trimmed[6..8]
        ));
    }

    Some(trimmed.to_owned())
}

/// `YYYY-MM-DD` to the compact `YYYYMMDD` form openFDA range queries expect.
pub(crate) fn compact_date(iso: &str) -> String {
    iso.chars().filter(|ch| ch.is_ascii_digit()).collect()
}
