// SEOForge platform paths
// Resolves where settings, the database and exports live on each OS.
//
// The OS-specific base directories come from `dirs`; `SEOFORGE_DATA_DIR`
// overrides the data directory (used by the RPC server and tests).

use std::path::PathBuf;

const APP_DIR: &str = "seoforge";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SEOFORGE_DATA_DIR";

fn fallback_base() -> PathBuf {
    std::env::temp_dir()
}

/// Returns the configuration directory for SEOForge.
///
/// - **Linux**: `$XDG_CONFIG_HOME/seoforge` or `~/.config/seoforge`
/// - **macOS**: `~/Library/Application Support/seoforge`
/// - **Windows**: `%APPDATA%/seoforge`
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(fallback_base).join(APP_DIR)
}

/// Returns the data directory, honouring [`DATA_DIR_ENV`].
pub fn get_data_dir() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::data_dir().unwrap_or_else(fallback_base).join(APP_DIR),
    }
}

/// Path of the SQLite database inside the data directory.
pub fn get_database_path() -> PathBuf {
    get_data_dir().join("seoforge.db")
}
