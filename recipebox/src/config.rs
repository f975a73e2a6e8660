use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use glob::glob;
use serde::de::DeserializeOwned;
use tracing::{error, info};

/// Settings of the recipe box, read from the `*.json` files of its root directory.
///
/// Files are merged in alphabetical order, so `local.json` overrides `default.json`.
/// `settings.json` is skipped. Sections like `view`, `store` and `tracing` are looked up by key
/// and are fixed for the lifetime of the store.
#[derive(Clone, Debug, Default)]
pub struct GenericConfig {
    pub root: PathBuf,
    config: config::Config,
}

impl GenericConfig {
    #[cfg(any(test, feature = "unstable"))]
    pub fn mock(config: serde_json::Value) -> Self {
        Self {
            root: "./test_data".into(),
            config: config::Config::builder()
                .add_source(config::Config::try_from(&config).unwrap())
                .build()
                .unwrap(),
        }
    }

    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let root = path.into();
        let json_path = root.join("*.json");
        let str = json_path
            .to_str()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid characters"))?;
        let paths: Result<Vec<_>, _> = glob(str)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .filter(|x| {
                x.as_ref()
                    .map(|p| p.file_name() != Some(OsStr::new("settings.json")))
                    .unwrap_or(true)
            })
            .collect();
        let mut paths = paths.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        paths.sort_unstable();

        let builder = paths
            .into_iter()
            .map(|p| {
                info!("Add config file: {p:?}");
                config::File::from(p)
            })
            .fold(
                config::Config::builder(),
                ConfigBuilder::<DefaultState>::add_source,
            );

        let config = builder
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        Ok(Self { config, root })
    }

    /// Resolves relative paths, like the log directory, against the root
    pub fn instrument_relative(&self, path: impl Into<PathBuf> + AsRef<Path>) -> PathBuf {
        if path.as_ref().is_relative() {
            self.root.join(path)
        } else {
            path.into()
        }
    }

    /// A missing section silently produces the default. An invalid one is logged, so a typo
    /// in e.g. `view.format` doesn't keep the catalog from being shown.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.config.get::<T>(key) {
            Ok(x) => x,
            Err(ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            }) => {
                error!(
                    "{key:?} cannot be parsed into {expected}, got {unexpected}, \
                    configuration src: {origin:?}. Using default instead"
                );
                T::default()
            }
            Err(ConfigError::NotFound(_)) => T::default(),
            Err(e) => {
                error!("Invalid configuration for '{key}': {e}. Using default instead");
                T::default()
            }
        }
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        Ok(self.config.get::<T>(key)?)
    }
}
