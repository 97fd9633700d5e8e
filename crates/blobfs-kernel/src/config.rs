//! blobfs configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration:
//!
//! ```toml
//! root = "root"          # key prefix the filesystem root maps to
//! separator = "/"        # canonical key separator
//! driver_separator = "/" # separator in host paths ("\\" for Dokan-style hosts)
//! free_space = 1099511627776
//!
//! [store]
//! backend = "sqlite"     # or "memory"
//! path = "/var/lib/blobfs/blobs.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::namespace::{Namespace, PathNormalizer};
use crate::store::{BlobStore, MemoryBlobStore, SqliteBlobStore, StoreResult};

/// One tebibyte.
pub const DEFAULT_FREE_SPACE: u64 = 1 << 40;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which store client to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

/// `[store]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database path for the SQLite backend. Defaults to
    /// `<data dir>/blobfs/blobs.db`.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// The SQLite database path, explicit or default.
    pub fn sqlite_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("blobfs")
                .join("blobs.db")
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobFsConfig {
    /// Store key prefix the filesystem root maps to.
    pub root: String,
    /// Canonical key separator.
    pub separator: char,
    /// Separator the filesystem host uses in paths.
    pub driver_separator: char,
    /// Bytes reported as free and available by `free_space`.
    pub free_space: u64,
    pub store: StoreConfig,
}

impl Default for BlobFsConfig {
    fn default() -> Self {
        Self {
            root: "root".to_string(),
            separator: '/',
            driver_separator: '/',
            free_space: DEFAULT_FREE_SPACE,
            store: StoreConfig::default(),
        }
    }
}

impl BlobFsConfig {
    /// Default config file location: `<config dir>/blobfs/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("blobfs").join("config.toml"))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load_default() -> ConfigResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        for sep in [self.separator, self.driver_separator] {
            if sep == '.' || sep.is_alphanumeric() {
                return Err(ConfigError::Invalid(format!(
                    "separator {sep:?} would be ambiguous inside path segments"
                )));
            }
        }
        Ok(())
    }

    /// Path normalizer for this configuration.
    pub fn normalizer(&self) -> PathNormalizer {
        PathNormalizer::new(&self.root, self.separator)
            .with_driver_separator(self.driver_separator)
    }

    /// Open the configured store client.
    pub fn open_store(&self) -> StoreResult<Arc<dyn BlobStore>> {
        match self.store.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryBlobStore::new())),
            StoreBackend::Sqlite => {
                let path = self.store.sqlite_path();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                tracing::info!(path = %path.display(), "opening sqlite blob store");
                Ok(Arc::new(SqliteBlobStore::open(&path)?))
            }
        }
    }

    /// Build a namespace over an already-opened store.
    pub fn namespace(&self, store: Arc<dyn BlobStore>) -> Namespace {
        Namespace::new(store, self.normalizer())
    }
}
