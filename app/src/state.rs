//! Application state management.

use crate::error::CommandError;
use odin_access::AccessEvaluator;
use odin_atlas::{DatasetLoader, DatasetSource, DirectorySource};
use odin_catalog::{builtin_registry, CatalogRegistry, CommandPalette};
use odin_core::{keys, AppConfig, FileStore, KeyValueStore};
use odin_settings::{QuickNotes, SettingsManager, ThemeProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Store handle shared by every component.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Application state shared across all commands.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,
    /// Persisted user state
    pub store: SharedStore,
    /// Navigable destinations
    pub registry: CatalogRegistry,
    /// Discipline datasets
    pub loader: DatasetLoader,
    /// Module visibility
    pub access: AccessEvaluator<SharedStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("registry", &self.registry.count())
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create state from configuration, with XDG-compliant paths.
    ///
    /// Opens the storage file and points the loader at the datasets
    /// directory. Neither needs to exist yet.
    pub fn new(config: AppConfig) -> Result<Self, CommandError> {
        let storage_path = config.storage_path()?;
        let datasets_dir = config.datasets_dir()?;

        info!("Storage file: {}", storage_path.display());
        info!("Datasets directory: {}", datasets_dir.display());
        if !datasets_dir.exists() {
            warn!("Datasets directory does not exist: {}", datasets_dir.display());
        }

        let store: SharedStore = Arc::new(FileStore::open(storage_path)?);
        Self::with_parts(config, store, DirectorySource::new(datasets_dir))
    }

    /// Create state over an explicit store and dataset source.
    pub fn with_parts(
        config: AppConfig,
        store: SharedStore,
        source: impl DatasetSource + 'static,
    ) -> Result<Self, CommandError> {
        let registry = builtin_registry()?;
        let access = AccessEvaluator::new(Arc::clone(&store));

        Ok(Self {
            config,
            store,
            registry,
            loader: DatasetLoader::new(source),
            access,
        })
    }

    /// Username of the active session, if any.
    pub fn current_user(&self) -> Option<String> {
        self.access.current_user()
    }

    /// Sign a user in by name. Profiles are managed elsewhere.
    pub fn sign_in(&self, username: &str) -> Result<(), CommandError> {
        self.store.set(keys::CURRENT_USER, username)?;
        info!(username = %username, "signed in");
        Ok(())
    }

    /// Clear the active session.
    pub fn sign_out(&self) -> Result<(), CommandError> {
        self.store.remove(keys::CURRENT_USER)?;
        Ok(())
    }

    /// A closed palette over the registry, gated by the access evaluator.
    pub fn palette(&self) -> CommandPalette<SharedStore> {
        let access = self.access.clone();
        CommandPalette::new(
            self.registry.clone(),
            Arc::clone(&self.store),
            self.config.catalog.recent_searches_cap,
            move |module_id| access.has_access(module_id),
        )
    }

    /// Theme provider with the configured default.
    pub fn themes(&self) -> ThemeProvider<SharedStore> {
        ThemeProvider::with_default_id(Arc::clone(&self.store), &self.config.general.theme)
    }

    /// Settings documents.
    pub fn settings(&self) -> SettingsManager<SharedStore> {
        SettingsManager::new(Arc::clone(&self.store))
    }

    /// Quick notes.
    pub fn notes(&self) -> QuickNotes<SharedStore> {
        QuickNotes::new(Arc::clone(&self.store))
    }
}
