use std::env;
use std::path::PathBuf;

use crate::env_parse;

/// Where uploaded certificates live and how they are served.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is mounted under
    pub public_path: String,
    pub max_file_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            public_path: "/uploads".to_string(),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            public_path: defaults.public_path,
            max_file_size: env_parse("UPLOAD_MAX_BYTES", defaults.max_file_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_five_megabytes() {
        let config = StorageConfig::default();
        assert_eq!(config.max_file_size, 5_242_880);
        assert_eq!(config.public_path, "/uploads");
    }
}
