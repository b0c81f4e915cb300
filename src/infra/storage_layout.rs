use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "acs-chat";
const LOG_FILE_NAME: &str = "acs-chat.log";

/// Per-user directories the console writes to. Only diagnostics live here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let state_base = env::var_os("XDG_STATE_HOME")
            .map(PathBuf::from)
            .filter(|path| path.is_absolute())
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve state base directory (XDG_STATE_HOME/HOME)".into(),
            })?;

        Ok(Self::under(&state_base))
    }

    fn under(state_base: &Path) -> Self {
        let state_dir = state_base.join(APP_DIR_NAME);
        let log_dir = state_dir.join("logs");

        Self { state_dir, log_dir }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.state_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}
