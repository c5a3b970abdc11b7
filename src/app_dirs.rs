use directories::ProjectDirs;
use std::path::PathBuf;

const LOG_FILE: &str = "speedtype.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `~/.local/state/speedtype/speedtype.log`, or the platform data dir without a HOME
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("speedtype");
            Some(state_dir.join(LOG_FILE))
        } else {
            ProjectDirs::from("", "", "speedtype")
                .map(|proj_dirs| proj_dirs.data_local_dir().join(LOG_FILE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_names_the_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with(LOG_FILE));
        }
    }
}
