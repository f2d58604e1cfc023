//! Store configuration
//!
//! The persistent store is opened from a configuration string. A plain string
//! is the database directory; a string ending in `.yaml` or `.yml` names a
//! YAML file holding a [`StoreConfig`].

use crate::storage::StorageResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Block compression used by the persistent store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    #[default]
    Lz4,
    Zstd,
}

impl From<Compression> for rocksdb::DBCompressionType {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::None => rocksdb::DBCompressionType::None,
            Compression::Lz4 => rocksdb::DBCompressionType::Lz4,
            Compression::Zstd => rocksdb::DBCompressionType::Zstd,
        }
    }
}

/// RocksDB tuning options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksConfig {
    /// Create the database if it does not exist
    pub create_if_missing: bool,
    /// Size of a single memtable in bytes
    pub write_buffer_size: usize,
    /// Maximum number of memtables
    pub max_write_buffer_number: i32,
    /// Block compression
    pub compression: Compression,
}

impl Default for RocksConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            write_buffer_size: 64 * 1024 * 1024, // 64 MB
            max_write_buffer_number: 3,
            compression: Compression::Lz4,
        }
    }
}

/// Persistent store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database directory
    pub path: PathBuf,
    /// RocksDB tuning
    #[serde(default)]
    pub rocksdb: RocksConfig,
}

impl StoreConfig {
    /// Configuration with default tuning for a directory
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            rocksdb: RocksConfig::default(),
        }
    }

    /// Resolve a configuration string
    pub fn from_configuration(configuration: &str) -> StorageResult<Self> {
        let path = Path::new(configuration);
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            let content = std::fs::read_to_string(path)?;
            let mut config: StoreConfig = serde_yaml::from_str(&content)?;
            // Relative database paths are resolved against the file's directory
            if config.path.is_relative() {
                if let Some(parent) = path.parent() {
                    config.path = parent.join(&config.path);
                }
            }
            Ok(config)
        } else {
            Ok(Self::new(path))
        }
    }
}
