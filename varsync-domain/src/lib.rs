//! # VarSync Domain Library (`varsync-domain`)
//!
//! The token graph engine. It keeps a three-tier design-token graph
//! (primitives, semantic tokens, component tokens) in an external variable
//! store reached through the [`store::VariableStore`] port.
//!
//! ## Modules
//!
//! - [`naming`]: dotted path to store name conversion and segment cleanup.
//! - [`model`]: collections, modes, variables and the literal/alias value union.
//! - [`store`]: the async store port and an in-memory adapter.
//! - [`primitives`]: colour scales, primitive tables and token mappings.
//! - [`modes`]: theme/breakpoint mode matrices and mode reconciliation.
//! - [`resolver`]: bounded, cycle-aware alias resolution.
//! - [`cache`]: the per-session variable cache.
//! - [`sync`]: the token synchronizer and the theme pipeline.
//! - [`export`]: resolved values as nested JSON.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use varsync_core::SyncConfig;
//! use varsync_domain::store::InMemoryVariableStore;
//! use varsync_domain::sync::{SyncRequest, TokenSynchronizer};
//!
//! let synchronizer = TokenSynchronizer::new(Arc::new(InMemoryVariableStore::new()), SyncConfig::default());
//! let response = synchronizer.synchronize(&SyncRequest::new("Semantic")).await;
//! assert!(response.is_success());
//! ```

pub mod cache;
pub mod error;
pub mod export;
pub mod model;
pub mod modes;
pub mod naming;
pub mod primitives;
pub mod resolver;
pub mod store;
pub mod sync;

pub use cache::VariableCache;
pub use error::{DomainError, DomainResult, NamingError, ResolveError, StoreError, SyncError};
pub use export::{export_collection, ExportedCollection, UnresolvedToken};
pub use model::{Collection, CollectionId, Literal, Mode, ModeId, Variable, VariableId, VariableType, VariableValue};
pub use modes::{BreakpointDescriptor, ModeMatrix, ModeMatrixBuilder, ModeReconciliation, ThemeDescriptor};
pub use primitives::{ColorScale, InteractionState, PrimitiveStore, TokenMapping};
pub use resolver::{GraphSnapshot, ResolvedValue};
pub use store::{InMemoryVariableStore, VariableStore};
pub use sync::{
    DeletionTarget, DesiredToken, DesiredValue, PipelineReport, SyncRequest, SyncResponse, ThemePipeline,
    TokenSynchronizer,
};

/// Builds a [`GraphSnapshot`] of everything currently in `store`.
pub async fn snapshot_store(store: &dyn VariableStore) -> Result<GraphSnapshot, StoreError> {
    let collections = store.list_collections().await?;
    let variables = store.list_variables(None).await?;
    Ok(GraphSnapshot::new(collections, variables))
}
