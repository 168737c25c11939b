//! Application-specific directory resolution.
//!
//! Relies on the `directories-next` crate. On Linux the configuration
//! directory resolves to `$XDG_CONFIG_HOME/varsync`.

use crate::error::{ConfigError, CoreError};
#[cfg(target_os = "linux")]
use directories_next::BaseDirs;
use directories_next::ProjectDirs;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "VarSync";
const APPLICATION: &str = "varsync";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Returns the per-user configuration directory, where `config.toml` lives.
///
/// # Errors
/// Returns [`ConfigError::DirectoryUnavailable`] when no home directory is known.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the per-user state directory, used for relative log file paths.
///
/// On Linux this is `$XDG_STATE_HOME/varsync`, falling back to
/// `~/.local/state/varsync`. `directories-next` has no state directory, so
/// other platforms use the local data directory.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    #[cfg(target_os = "linux")]
    {
        let base = BaseDirs::new().ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "App State".to_string(),
            })
        })?;
        Ok(linux_state_home(std::env::var("XDG_STATE_HOME").ok(), base.home_dir()).join(APPLICATION))
    }
    #[cfg(not(target_os = "linux"))]
    {
        project_dirs("App State").map(|dirs| dirs.data_local_dir().to_path_buf())
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn linux_state_home(xdg_state_home: Option<String>, home: &Path) -> PathBuf {
    match xdg_state_home {
        Some(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
        _ => home.join(".local/state"),
    }
}

/// Creates `path` and its parents if they do not exist yet.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| CoreError::Filesystem {
        message: "Failed to create directory".to_string(),
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_exists_creates_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("logs").join("sync");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_linux_state_home_prefers_xdg_variable() {
        let home = Path::new("/home/dev");
        assert_eq!(
            linux_state_home(Some("/var/state".to_string()), home),
            PathBuf::from("/var/state")
        );
        assert_eq!(linux_state_home(Some(String::new()), home), home.join(".local/state"));
        assert_eq!(linux_state_home(None, home), home.join(".local/state"));
    }

    #[test]
    fn test_ensure_dir_exists_reports_file_in_the_way() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").unwrap();
        let err = ensure_dir_exists(&file.join("child")).unwrap_err();
        assert!(matches!(err, CoreError::Filesystem { .. }));
    }
}
