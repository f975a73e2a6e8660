use serde::{Deserialize, Deserializer};
use std::{
    collections::BTreeMap,
    ops::Deref,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::Level;

use crate::GenericConfig;

/// The `tracing` section of the recipe box config.
///
/// By default everything is logged at `debug`, except the noisy store notifications and config
/// loading, and logs are additionally written to `logs` below the root.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    default_level: tracing::Level,
    filters: BTreeMap<String, tracing::Level>,
    file: Option<TracingFileConfig>,
}

impl<'a> From<&'a GenericConfig> for TracingConfig {
    fn from(value: &'a GenericConfig) -> Self {
        let p = value.get_or_default::<TracingConfigPrivate>("tracing");
        Self {
            default_level: p.default_level.0,
            filters: p.filters.into_iter().map(|(k, v)| (k, v.0)).collect(),
            file: p.file,
        }
        .instrument_path(value)
    }
}

impl TracingConfig {
    /// Directive string as understood by `EnvFilter`, e.g. `debug,recipebox::store=info`
    pub fn log_string(&self) -> String {
        std::iter::once(self.default_level.to_string().to_lowercase())
            .chain(
                self.filters
                    .iter()
                    .map(|(topic, level)| format!("{topic}={}", level.to_string().to_lowercase())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    fn instrument_path(mut self, root: &GenericConfig) -> Self {
        if let Some(file_config) = self.file.as_mut() {
            file_config.path = root.instrument_relative(&file_config.path);
        }
        self
    }

    pub fn directory(&self) -> Option<&Path> {
        self.file.as_ref().map(|x| x.path.deref())
    }

    pub fn file(&self) -> Option<&TracingFileConfig> {
        self.file.as_ref()
    }
}

#[derive(Debug, Clone)]
struct LevelWrapper(tracing::Level);

impl<'de> Deserialize<'de> for LevelWrapper {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let variant = String::deserialize(deserializer)?;
        let level =
            tracing::Level::from_str(&variant).map_err(<D::Error as serde::de::Error>::custom)?;
        Ok(LevelWrapper(level))
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct TracingConfigPrivate {
    default_level: LevelWrapper,
    filters: BTreeMap<String, LevelWrapper>,
    file: Option<TracingFileConfig>,
}

impl Default for TracingConfigPrivate {
    fn default() -> Self {
        Self {
            default_level: LevelWrapper(Level::DEBUG),
            filters: [
                ("config", LevelWrapper(Level::INFO)),
                ("recipebox::store", LevelWrapper(Level::INFO)),
            ]
            .into_iter()
            .map(|(t, l)| (t.into(), l))
            .collect(),
            file: Some(Default::default()),
        }
    }
}

/// Rolling logfiles, of which only the newest `number_of_files` are kept
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TracingFileConfig {
    pub path: PathBuf,
    pub number_of_files: usize,
}

impl Default for TracingFileConfig {
    fn default() -> Self {
        Self {
            path: "./logs".into(),
            number_of_files: 2,
        }
    }
}
