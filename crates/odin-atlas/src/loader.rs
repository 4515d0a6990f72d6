//! Discipline dataset loading.
//!
//! A [`DatasetSource`] resolves a discipline id to its dataset. The
//! [`DatasetLoader`] memoizes successful loads so navigating back to a
//! discipline does not fetch it again, and a [`Navigation`] tracks the view
//! state of one route visit, discarding the result if the visit is
//! cancelled before the load settles.

use crate::{
    dataset::DisciplineData,
    error::{AtlasError, Result},
};
use async_trait::async_trait;
use odin_core::DisciplineId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Content source keyed by discipline id.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch a discipline's dataset.
    ///
    /// # Errors
    /// Returns [`AtlasError::NotFound`] if the id is unknown, or another
    /// error if the dataset exists but cannot be read.
    async fn fetch(&self, discipline: &DisciplineId) -> Result<DisciplineData>;

    /// Ids of every available discipline, sorted.
    async fn disciplines(&self) -> Result<Vec<DisciplineId>>;
}

/// Datasets stored as `<dir>/<discipline>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source over a directory. The directory may not exist yet.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the dataset files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, discipline: &DisciplineId) -> PathBuf {
        self.dir.join(format!("{discipline}.json"))
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    async fn fetch(&self, discipline: &DisciplineId) -> Result<DisciplineData> {
        let path = self.path_for(discipline);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AtlasError::NotFound {
                    discipline: discipline.to_string(),
                });
            }
            Err(source) => {
                return Err(AtlasError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let data: DisciplineData =
            serde_json::from_str(&raw).map_err(|source| AtlasError::InvalidDataset {
                discipline: discipline.to_string(),
                source,
            })?;

        debug!(
            discipline = %discipline,
            path = %path.display(),
            entities = data.entities.len(),
            "read dataset file"
        );
        Ok(data)
    }

    async fn disciplines(&self) -> Result<Vec<DisciplineId>> {
        let io_err = |source| AtlasError::Io {
            path: self.dir.display().to_string(),
            source,
        };

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match DisciplineId::new(stem) {
                Ok(id) => ids.push(id),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping dataset with invalid name"),
            }
        }

        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }
}

/// In-memory datasets, for tests and embedded content.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<String, DisciplineData>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset.
    #[must_use]
    pub fn with(mut self, discipline: &DisciplineId, data: DisciplineData) -> Self {
        self.datasets.insert(discipline.to_string(), data);
        self
    }
}

#[async_trait]
impl DatasetSource for MemorySource {
    async fn fetch(&self, discipline: &DisciplineId) -> Result<DisciplineData> {
        self.datasets
            .get(discipline.as_str())
            .cloned()
            .ok_or_else(|| AtlasError::NotFound {
                discipline: discipline.to_string(),
            })
    }

    async fn disciplines(&self) -> Result<Vec<DisciplineId>> {
        let mut names: Vec<&String> = self.datasets.keys().collect();
        names.sort();
        Ok(names
            .into_iter()
            .filter_map(|name| DisciplineId::new(name.as_str()).ok())
            .collect())
    }
}

/// Memoizing loader over a dataset source.
///
/// Only successful loads are remembered: a failed load is terminal for its
/// navigation and the next navigation retries.
#[derive(Clone)]
pub struct DatasetLoader {
    source: Arc<dyn DatasetSource>,
    cache: Arc<RwLock<HashMap<String, Arc<DisciplineData>>>>,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("DatasetLoader")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// Create a loader over a source.
    pub fn new(source: impl DatasetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load a discipline by id.
    ///
    /// An id that is not a valid discipline id is reported as not found.
    pub async fn load(&self, discipline: &str) -> Result<Arc<DisciplineData>> {
        let Ok(id) = DisciplineId::new(discipline) else {
            debug!(discipline, "invalid discipline id");
            return Err(AtlasError::NotFound {
                discipline: discipline.to_string(),
            });
        };

        if let Some(data) = self.cached(&id) {
            debug!(discipline = %id, "dataset cache hit");
            return Ok(data);
        }

        let data = self.source.fetch(&id).await?;
        if let Some(entity_id) = data.unroutable_entity() {
            warn!(discipline = %id, entity_id, "dataset rejected: entity id cannot appear in a route");
            return Err(AtlasError::UnroutableEntity {
                discipline: id.to_string(),
                entity_id: entity_id.to_string(),
            });
        }

        let data = Arc::new(data);
        let mut cache = self.cache.write().expect("dataset cache lock poisoned");
        let data = Arc::clone(cache.entry(id.to_string()).or_insert(data));
        info!(discipline = %id, entities = data.entities.len(), "loaded dataset");
        Ok(data)
    }

    /// Previously loaded dataset, if any.
    #[must_use]
    pub fn cached(&self, discipline: &DisciplineId) -> Option<Arc<DisciplineData>> {
        let cache = self.cache.read().expect("dataset cache lock poisoned");
        cache.get(discipline.as_str()).cloned()
    }

    /// Available discipline ids.
    pub async fn disciplines(&self) -> Result<Vec<DisciplineId>> {
        self.source.disciplines().await
    }

    /// Start a navigation to a discipline.
    #[must_use]
    pub fn navigate(&self, discipline: impl Into<String>) -> Navigation {
        Navigation {
            discipline: discipline.into(),
            state: LoadState::Loading,
            token: CancellationToken::new(),
        }
    }
}

/// View state of a discipline route.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// The load has not settled
    Loading,
    /// No dataset has this id
    NotFound {
        /// Requested id
        discipline: String,
    },
    /// The dataset exists but has no entities
    Empty(Arc<DisciplineData>),
    /// The dataset has entities
    Loaded(Arc<DisciplineData>),
    /// The dataset exists but could not be read
    Failed {
        /// Human-readable reason
        reason: String,
    },
}

impl LoadState {
    fn from_result(discipline: &str, result: Result<Arc<DisciplineData>>) -> Self {
        match result {
            Ok(data) if data.is_empty() => Self::Empty(data),
            Ok(data) => Self::Loaded(data),
            Err(e) if e.is_not_found() => Self::NotFound {
                discipline: discipline.to_string(),
            },
            Err(e) => {
                warn!(discipline, error = %e, "dataset load failed");
                Self::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The dataset, when one loaded.
    #[must_use]
    pub fn data(&self) -> Option<&Arc<DisciplineData>> {
        match self {
            Self::Empty(data) | Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Short name of the state.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::NotFound { .. } => "not-found",
            Self::Empty(_) => "empty",
            Self::Loaded(_) => "loaded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// How a navigation's load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The load settled and the view state was updated
    Settled,
    /// The navigation was cancelled; the view state is unchanged
    Cancelled,
}

/// One visit to a discipline route.
#[derive(Debug)]
pub struct Navigation {
    discipline: String,
    state: LoadState,
    token: CancellationToken,
}

impl Navigation {
    /// Requested discipline id.
    #[must_use]
    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Handle that cancels this navigation, e.g. when the user leaves the
    /// route.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel this navigation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Run the load and settle the view state, unless cancelled first.
    pub async fn run(&mut self, loader: &DatasetLoader) -> LoadOutcome {
        if self.token.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        let result = tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            result = loader.load(&self.discipline) => Some(result),
        };

        match result {
            Some(result) if !self.token.is_cancelled() => {
                self.state = LoadState::from_result(&self.discipline, result);
                debug!(discipline = %self.discipline, state = self.state.label(), "navigation settled");
                LoadOutcome::Settled
            }
            _ => {
                debug!(discipline = %self.discipline, "navigation cancelled, discarding result");
                LoadOutcome::Cancelled
            }
        }
    }
}
