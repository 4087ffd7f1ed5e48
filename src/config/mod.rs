#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod file;
pub mod settings;

use std::path::{Path, PathBuf};

use crate::domain::ports::Storage;
use crate::utils::error::Result;

#[cfg(feature = "cli")]
pub use cli::{DatagenCli, TutorCli};
pub use credentials::Credentials;
pub use file::DatagenFileConfig;
pub use settings::DatagenSettings;

/// Filesystem-backed storage rooted at a base directory. Writes overwrite
/// existing content at the destination without merging.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = std::fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(full_path, data)?;
        Ok(())
    }
}
