//! Application-level configuration constants.

// API
pub const DEFAULT_API_BASE: &str = "/api";

/// Base path of the prediction API. Override at build time with
/// `UNDERCUT_API_BASE=https://host/api trunk build`.
pub fn api_base() -> &'static str {
    option_env!("UNDERCUT_API_BASE")
        .map(|base| base.trim_end_matches('/'))
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
}

// UI Behavior
pub const ERROR_BANNER_MS: u32 = 5_000;
pub const TOAST_MS: u32 = 3_000;

// Seasons offered in the year selector
pub const FIRST_SEASON: u16 = 2018;
pub const LAST_SEASON: u16 = 2024;

// Button labels, restored when a request finishes
pub const PREDICT_LABEL: &str = "Predict Undercut";
pub const PREDICT_TIMING_LABEL: &str = "Predict Best Timing";

/// Seasons in selector order, newest first.
pub fn seasons() -> impl Iterator<Item = u16> {
    (FIRST_SEASON..=LAST_SEASON).rev()
}
