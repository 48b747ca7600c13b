use std::ffi::OsString;
use std::path::PathBuf;

use crate::data::aggregate::Thresholds;

/// Environment variable naming a CSV file to open at startup.
pub const DATA_PATH_ENV: &str = "HEART_DASH_CSV";

/// Startup configuration of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Dataset loaded before the first frame, if any.
    pub initial_path: Option<PathBuf>,
    pub thresholds: Thresholds,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let initial_path = lookup(DATA_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        DashboardConfig {
            initial_path,
            ..Default::default()
        }
    }
}
