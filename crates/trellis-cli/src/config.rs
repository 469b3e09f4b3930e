use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk layout and taxonomy configuration, loaded from `trellis.toml`.
///
/// Every field has a default; a missing config file means "all defaults",
/// and a partial file overrides only what it names.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Root directory for all persisted data.
    pub data_dir: PathBuf,
    /// Category collection file, relative to `data_dir`.
    pub categories_file: String,
    /// Aggregate post index file, relative to `data_dir`.
    pub posts_file: String,
    /// Per-post shard directory, relative to `data_dir`.
    pub shard_dir: String,
    /// Name of the reserved default category.
    pub default_category: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            categories_file: "categories.json".into(),
            posts_file: "posts.json".into(),
            shard_dir: "posts".into(),
            default_category: "Uncategorized".into(),
        }
    }
}

impl PlatformConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize to TOML (for `trellis init`).
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the category collection file.
    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join(&self.categories_file)
    }

    /// Path of the aggregate post index.
    pub fn posts_index_path(&self) -> PathBuf {
        self.data_dir.join(&self.posts_file)
    }

    /// Path of the shard directory.
    pub fn shards_path(&self) -> PathBuf {
        self.data_dir.join(&self.shard_dir)
    }
}
