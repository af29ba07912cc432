use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable that overrides the scripts directory.
pub const SCRIPTS_DIR_ENV: &str = "SCRIPTVIEW_DIR";

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the scripts directory from, in order of priority:
    /// 1. An explicit path (from --dir)
    /// 2. The SCRIPTVIEW_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/scriptview/scripts)
    ///
    /// The directory is not created. A missing directory simply lists no
    /// documents.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var(SCRIPTS_DIR_ENV) {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("scriptview")
                .get_data_home()
                .map(|home| home.join("scripts"))
                .ok_or_else(|| Error::DataDir(PathBuf::from("$XDG_DATA_HOME")))?
        };

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}
