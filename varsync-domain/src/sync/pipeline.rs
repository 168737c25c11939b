//! End-to-end theme synchronization: primitives first, then semantic tokens
//! aliasing into them.

use std::sync::Arc;
use tracing::info;

use super::service::TokenSynchronizer;
use super::types::{SyncRequest, SyncResponse};
use crate::error::SyncError;
use crate::export::ExportedCollection;
use crate::modes::{expand_theme_modes, ThemeDescriptor};
use crate::primitives::{PrimitiveStore, TokenMapping};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub primitives: SyncResponse,
    pub semantic: SyncResponse,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.primitives.is_success() && self.semantic.is_success()
    }
}

pub struct ThemePipeline {
    synchronizer: Arc<TokenSynchronizer>,
    primitives: PrimitiveStore,
}

impl ThemePipeline {
    pub fn new(synchronizer: Arc<TokenSynchronizer>) -> Self {
        Self {
            synchronizer,
            primitives: PrimitiveStore::new(),
        }
    }

    /// Extra primitives (numeric scales, fixed palettes) synced alongside the
    /// theme palettes.
    pub fn with_primitives(mut self, primitives: PrimitiveStore) -> Self {
        self.primitives = primitives;
        self
    }

    /// Syncs one palette per theme into the primitives collection, then one
    /// semantic token per mapping into `semantic_collection`.
    ///
    /// Both passes run in one session. The semantic pass requires the
    /// primitives collection.
    pub async fn run(
        &self,
        themes: &[ThemeDescriptor],
        mappings: &[TokenMapping],
        semantic_collection: &str,
    ) -> PipelineReport {
        let config = self.synchronizer.config();

        let mut primitives = PrimitiveStore::from_themes(themes, &config.system_theme_id);
        primitives.merge(&self.primitives);
        let primitive_modes = vec![config.primitive_mode_name.clone()];
        let primitives_request = SyncRequest::new(config.primitives_collection.clone())
            .with_tokens(primitives.desired_tokens(&primitive_modes))
            .with_modes(primitive_modes);

        let theme_modes = expand_theme_modes(themes, &config.system_theme_id);
        let semantic_request = SyncRequest::new(semantic_collection)
            .with_tokens(mappings.iter().map(|m| m.desired_token(&theme_modes)).collect())
            .with_modes(theme_modes.iter().map(|m| m.name.clone()))
            .requiring(config.primitives_collection.clone());

        info!(
            themes = themes.len(),
            mappings = mappings.len(),
            modes = theme_modes.len(),
            "Running theme pipeline"
        );
        let mut responses = self
            .synchronizer
            .synchronize_all(&[primitives_request, semantic_request])
            .await
            .into_iter();

        PipelineReport {
            primitives: responses.next().unwrap_or_default(),
            semantic: responses.next().unwrap_or_default(),
        }
    }

    /// Exports a collection written by [`run`](Self::run), bounded by the
    /// synchronizer's configured alias depth.
    pub async fn export(&self, collection_name: &str, mode_name: &str) -> Result<ExportedCollection, SyncError> {
        self.synchronizer.export(collection_name, mode_name).await
    }
}
