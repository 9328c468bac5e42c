use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn history_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.csv"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kadans").map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("kadans"),
            )
        } else {
            ProjectDirs::from("", "", "kadans")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
