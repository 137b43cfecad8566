//! Data-folder resolution
//!
//! The server keeps its SQLite database under a single data folder. The
//! folder is resolved once at startup with this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `COURSEBRIDGE_ROOT` environment variable
//! 3. OS-dependent compiled default (fallback)

use std::path::PathBuf;

/// Environment variable overriding the data folder location
pub const ROOT_ENV_VAR: &str = "COURSEBRIDGE_ROOT";

/// Resolve the data folder using the documented priority order
pub fn resolve_data_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: OS-dependent compiled default
    default_data_folder()
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/coursebridge (or /var/lib/coursebridge system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("coursebridge"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/coursebridge"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/coursebridge
        dirs::data_dir()
            .map(|d| d.join("coursebridge"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/coursebridge"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\coursebridge
        dirs::data_local_dir()
            .map(|d| d.join("coursebridge"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\coursebridge"))
    } else {
        PathBuf::from("./coursebridge_data")
    }
}

/// Default database path inside a data folder
pub fn database_path(data_folder: &std::path::Path) -> PathBuf {
    data_folder.join("coursebridge.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_argument_wins_over_environment() {
        std::env::set_var(ROOT_ENV_VAR, "/tmp/from-env");
        let resolved = resolve_data_folder(Some("/tmp/from-cli"));
        std::env::remove_var(ROOT_ENV_VAR);
        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
    }

    #[test]
    #[serial]
    fn environment_wins_over_default() {
        std::env::set_var(ROOT_ENV_VAR, "/tmp/from-env");
        let resolved = resolve_data_folder(None);
        std::env::remove_var(ROOT_ENV_VAR);
        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
    }

    #[test]
    #[serial]
    fn empty_environment_value_is_ignored() {
        std::env::set_var(ROOT_ENV_VAR, "");
        let resolved = resolve_data_folder(None);
        std::env::remove_var(ROOT_ENV_VAR);
        assert_ne!(resolved, PathBuf::from(""));
    }

    #[test]
    fn database_path_is_under_data_folder() {
        let path = database_path(std::path::Path::new("/srv/cb"));
        assert_eq!(path, PathBuf::from("/srv/cb/coursebridge.db"));
    }
}
