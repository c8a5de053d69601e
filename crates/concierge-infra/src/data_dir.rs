//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CONCIERGE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CONCIERGE_DATA_DIR` environment variable
/// 2. `~/.concierge`
/// 3. `./.concierge`
pub fn resolve_data_dir() -> PathBuf {
    resolve_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn resolve_from(env_dir: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(home) = home {
        return home.join(".concierge");
    }
    PathBuf::from(".concierge")
}
