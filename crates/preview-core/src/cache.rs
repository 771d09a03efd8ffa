//! Model cache
//!
//! Loads each model asset at most once per session. Concurrent requests for
//! a model that is still loading wait on the same in-flight load.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use parking_lot::Mutex;

use crate::config::PreviewConfig;
use crate::error::{AssetError, PreviewError};
use crate::mesh::Mesh;
use crate::model::ModelKind;

/// Where model files come from (filesystem, HTTP, test fixtures)
pub trait AssetSource {
    /// Fetch the raw bytes at `path`
    fn fetch(&self, path: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, AssetError>>;
}

/// A model whose mesh is ready to be shown
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub kind: ModelKind,
    pub mesh: Arc<Mesh>,
}

type LoadFuture = Shared<LocalBoxFuture<'static, Result<LoadedModel, PreviewError>>>;

enum Slot {
    Ready(LoadedModel),
    Loading { generation: u64, load: LoadFuture },
}

/// Keyed store of loaded models, owned by the application root
pub struct ModelCache<S> {
    source: Arc<S>,
    asset_base: String,
    extension: String,
    slots: Mutex<HashMap<ModelKind, Slot>>,
    next_generation: AtomicU64,
}

impl<S: AssetSource + 'static> ModelCache<S> {
    /// Create a cache that reads `<asset_base>/<id>.<extension>` from `source`
    pub fn new(source: S, asset_base: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            source: Arc::new(source),
            asset_base: asset_base.into(),
            extension: extension.into(),
            slots: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Create a cache using the asset location from `config`
    pub fn with_config(source: S, config: &PreviewConfig) -> Self {
        Self::new(source, &config.asset_base, &config.model_extension)
    }

    /// The asset source backing this cache
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached model, loading it on first request.
    ///
    /// On failure nothing is cached, so a later call retries the load.
    pub async fn get_or_load(&self, kind: ModelKind) -> Result<LoadedModel, PreviewError> {
        let (generation, load) = {
            let mut slots = self.slots.lock();
            match slots.get(&kind) {
                Some(Slot::Ready(model)) => return Ok(model.clone()),
                Some(Slot::Loading { generation, load }) => {
                    tracing::debug!(model = %kind, "Joining in-flight model load");
                    (*generation, load.clone())
                }
                None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let load = self.load(kind).boxed_local().shared();
                    slots.insert(
                        kind,
                        Slot::Loading {
                            generation,
                            load: load.clone(),
                        },
                    );
                    (generation, load)
                }
            }
        };

        let result = load.await;

        let mut slots = self.slots.lock();
        let still_pending = matches!(
            slots.get(&kind),
            Some(Slot::Loading { generation: g, .. }) if *g == generation
        );
        if still_pending {
            match &result {
                Ok(model) => {
                    slots.insert(kind, Slot::Ready(model.clone()));
                }
                Err(_) => {
                    slots.remove(&kind);
                }
            }
        }

        result
    }

    /// Like [`get_or_load`](Self::get_or_load) for a model named by identifier
    pub async fn get_or_load_id(&self, id: &str) -> Result<LoadedModel, PreviewError> {
        let kind = id.parse::<ModelKind>()?;
        self.get_or_load(kind).await
    }

    /// Returns true if `kind` is loaded (not merely loading)
    pub fn contains(&self, kind: ModelKind) -> bool {
        matches!(self.slots.lock().get(&kind), Some(Slot::Ready(_)))
    }

    /// Number of loaded models
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    /// Returns true if no model is loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(
        &self,
        kind: ModelKind,
    ) -> impl Future<Output = Result<LoadedModel, PreviewError>> + use<S> {
        let source = Arc::clone(&self.source);
        let path = kind.asset_path(&self.asset_base, &self.extension);

        async move {
            tracing::debug!(model = %kind, %path, "Fetching model asset");
            let bytes = source.fetch(&path).await.map_err(|e| {
                tracing::warn!(model = %kind, %path, "Model fetch failed: {}", e);
                PreviewError::asset_load(kind, e)
            })?;

            let mesh = Mesh::from_obj_bytes(kind.id(), &bytes).map_err(|e| {
                tracing::warn!(model = %kind, %path, "Model asset rejected: {}", e);
                PreviewError::asset_load(kind, e)
            })?;

            tracing::info!(
                model = %kind,
                vertices = mesh.positions.len(),
                triangles = mesh.triangle_count(),
                "Loaded model"
            );
            Ok(LoadedModel {
                kind,
                mesh: Arc::new(mesh),
            })
        }
    }
}
