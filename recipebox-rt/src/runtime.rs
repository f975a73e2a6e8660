use std::{any::Any, path::PathBuf};

use anyhow::{anyhow, Context};
use minfac::{ServiceCollection, ServiceProvider};
use recipebox::{GenericConfig, Store, StoreConfig, ViewConfig};
use tokio::runtime::Builder;
use tracing::info;
#[cfg(feature = "tracing")]
use tracing::warn;

pub struct Runtime {
    services: ServiceCollection,
    #[cfg(feature = "tracing")]
    _tracing_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl Runtime {
    /// Uses the directory from `RECIPEBOX_ROOT` or `data` if it is not set
    pub fn from_env() -> anyhow::Result<Self> {
        Self::with_root(std::env::var("RECIPEBOX_ROOT").unwrap_or_else(|_| "data".into()))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Can't create root dir {root:?}"))?;
        let config = GenericConfig::new(&root).context("Invalid config")?;

        #[cfg(feature = "tracing")]
        let _tracing_guard = match crate::tracing::init(&config) {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Tracing was not initialized: {e}");
                None
            }
        };

        info!("Start recipebox within root '{:?}'", config.root);

        let store = Store::new(StoreConfig::from(&config));
        let mut services = ServiceCollection::new();
        services.register_instance(ViewConfig::from(&config));
        services.register_instance(store);
        services.register_instance(config);

        Ok(Self {
            services,
            #[cfg(feature = "tracing")]
            _tracing_guard,
        })
    }

    pub fn register_instance(mut self, instance: impl Clone + Send + Sync + Any) -> Self {
        self.services.register_instance(instance);
        self
    }

    pub fn configure(self) -> anyhow::Result<ConfiguredRuntime> {
        let tokio = Builder::new_current_thread()
            .thread_name("recipebox")
            .enable_all()
            .build()?;
        let provider = self
            .services
            .build()
            .map_err(|e| anyhow!("Missing dependencies: {e:?}"))?;

        Ok(ConfiguredRuntime {
            tokio,
            provider,
            #[cfg(feature = "tracing")]
            _tracing_guard: self._tracing_guard,
        })
    }
}

pub struct ConfiguredRuntime {
    tokio: tokio::runtime::Runtime,
    pub provider: ServiceProvider,
    #[cfg(feature = "tracing")]
    _tracing_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl ConfiguredRuntime {
    pub fn run_until_finished<TFut: std::future::Future>(self, other: TFut) -> TFut::Output {
        info!("Tokio runtime has started.");
        let r = self.tokio.block_on(other);
        info!("Tokio runtime has ended.");
        r
    }
}
