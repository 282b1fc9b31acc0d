use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use witter::cli::DatasetPaths;
use witter::storage::StoreOptions;
use witter::WitterError;

/// Settings read from the TOML config file.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    /// Reads `explicit`, or the default location when `None`.
    ///
    /// A missing default file yields empty settings; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, WitterError> {
        let data = match explicit.as_ref() {
            Some(path) => read_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_file(&path)?,
                _ => RawConfig::default(),
            },
        };
        let path = explicit.or_else(default_config_path);
        Ok(Self { path, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Applies the `[store]` section on top of the library defaults.
    pub fn store_options(&self) -> StoreOptions {
        let section = &self.data.store;
        let mut opts = StoreOptions::new();
        if let Some(buckets) = section.relation_buckets {
            opts = opts.relation_buckets(buckets);
        }
        if let Some(buckets) = section.content_buckets {
            opts = opts.content_buckets(buckets);
        }
        if let Some(limit) = section.trending_limit {
            opts = opts.trending_limit(limit);
        }
        opts
    }

    /// Dataset files from the `[dataset]` section. Relative paths are resolved
    /// against the directory holding the config file.
    pub fn dataset(&self) -> DatasetPaths {
        let section = &self.data.dataset;
        DatasetPaths {
            users: section.users.as_ref().map(|p| self.resolve(p)),
            follows: section.follows.as_ref().map(|p| self.resolve(p)),
            weets: section.weets.as_ref().map(|p| self.resolve(p)),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match self.path.as_ref().and_then(|config| config.parent()) {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn read_file(path: &Path) -> Result<RawConfig, WitterError> {
    let contents = fs::read_to_string(path).map_err(|source| WitterError::Config {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    toml::from_str(&contents).map_err(|source| WitterError::Config {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    store: StoreSection,
    #[serde(default)]
    dataset: DatasetSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreSection {
    relation_buckets: Option<usize>,
    content_buckets: Option<usize>,
    trending_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetSection {
    users: Option<PathBuf>,
    follows: Option<PathBuf>,
    weets: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("witter").join("config.toml"))
}
