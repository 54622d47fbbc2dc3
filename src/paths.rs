//! Centralised shrc user-directory resolution.
//!
//! When `SHRC_HOME` is set, it replaces the platform-native config directory.
//!
//! Priority for the user-level base directory:
//!   1. `SHRC_HOME` env var (if set and non-empty)
//!   2. `dirs::config_dir().map(|d| d.join("shrc"))` (platform default)

use std::path::{Path, PathBuf};

/// Return the `SHRC_HOME` path when set and non-empty, otherwise fall through
/// to the platform-native `dirs_fallback`.
fn resolve_user_path(dirs_fallback: Option<PathBuf>) -> Option<PathBuf> {
    if let Ok(home) = std::env::var("SHRC_HOME")
        && !home.is_empty()
    {
        return Some(PathBuf::from(home));
    }
    dirs_fallback
}

/// Returns the shrc user-level base directory (holds `config.toml`).
pub fn user_dir() -> Option<PathBuf> {
    resolve_user_path(dirs::config_dir().map(|d| d.join("shrc")))
}

/// Path of the user configuration layer.
pub fn user_config_file() -> Option<PathBuf> {
    user_dir().map(|d| d.join("config.toml"))
}

/// Expand a leading `~` or `~/` against the home directory.
///
/// Other forms (`~user/...`) are returned unchanged.
pub fn expand_tilde(raw: &str) -> PathBuf {
    expand_tilde_with(raw, dirs::home_dir().as_deref())
}

pub(crate) fn expand_tilde_with(raw: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        return home.to_path_buf();
    }
    raw.strip_prefix("~/")
        .map_or_else(|| PathBuf::from(raw), |rest| home.join(rest))
}
