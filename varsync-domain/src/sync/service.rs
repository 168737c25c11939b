//! The token synchronizer: reconciles desired tokens with a collection.
//!
//! A pass runs in input order and never aborts on a single bad token. Every
//! failure is stringified into the response. The only pass-level failure is a
//! missing required collection, detected before anything is written.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use varsync_core::{Color, SyncConfig};

use super::types::{ChangeKind, DeletionTarget, DesiredToken, DesiredValue, SyncRequest, SyncResponse};
use crate::cache::VariableCache;
use crate::error::{DomainResult, SyncError};
use crate::export::{export_collection, ExportedCollection};
use crate::model::{Collection, Literal, ModeId, Variable, VariableId, VariableType, VariableValue};
use crate::modes::{ModeMatrixBuilder, ModeReconciliation};
use crate::resolver::{GraphSnapshot, ResolvedValue};
use crate::naming::{parse_reference, token_name, trailing_number};
use crate::store::VariableStore;

/// The token currently being written.
struct TokenContext<'a> {
    name: &'a str,
    variable: &'a Variable,
    collection: &'a Collection,
}

pub struct TokenSynchronizer {
    store: Arc<dyn VariableStore>,
    config: SyncConfig,
    modes: ModeMatrixBuilder,
    /// Held for the whole of every pass so overlapping calls serialize.
    session: Mutex<()>,
}

impl TokenSynchronizer {
    pub fn new(store: Arc<dyn VariableStore>, config: SyncConfig) -> Self {
        let modes = ModeMatrixBuilder::new(config.default_mode_name.clone());
        Self {
            store,
            config,
            modes,
            session: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn VariableStore> {
        Arc::clone(&self.store)
    }

    /// Runs one synchronization pass.
    pub async fn synchronize(&self, request: &SyncRequest) -> SyncResponse {
        let _session = self.session.lock().await;
        let mut cache = VariableCache::new();
        self.run_pass(request, &mut cache).await
    }

    /// Runs several passes back to back within one session.
    ///
    /// Each pass starts from an invalidated cache, so later passes see what
    /// earlier ones wrote.
    pub async fn synchronize_all(&self, requests: &[SyncRequest]) -> Vec<SyncResponse> {
        let _session = self.session.lock().await;
        let mut cache = VariableCache::new();
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            cache.invalidate();
            responses.push(self.run_pass(request, &mut cache).await);
        }
        responses
    }

    /// Deletes variables from an existing collection.
    pub async fn delete_variables(&self, collection_name: &str, targets: &[DeletionTarget]) -> SyncResponse {
        let _session = self.session.lock().await;
        let mut response = SyncResponse::default();

        let collection = match self.store.find_collection_by_name(collection_name).await {
            Ok(Some(collection)) => collection,
            Ok(None) => {
                let err = SyncError::MissingCollections {
                    names: vec![collection_name.to_string()],
                };
                response.errors.push(err.to_string());
                return response;
            }
            Err(e) => {
                response.errors.push(format!("Failed to look up collection '{}': {}", collection_name, e));
                return response;
            }
        };

        let mut cache = VariableCache::new();
        if let Err(e) = cache.ensure_loaded(self.store.as_ref()).await {
            response.errors.push(format!("Failed to load variables: {}", e));
            return response;
        }
        self.apply_deletions(&collection, targets, &mut cache, &mut response).await;
        info!(collection = %collection.name, deleted = response.deleted, errors = response.errors.len(), "Deletion pass finished");
        response
    }

    /// A snapshot of the whole store, taken between passes.
    pub async fn snapshot(&self) -> Result<GraphSnapshot, SyncError> {
        let _session = self.session.lock().await;
        Ok(crate::snapshot_store(self.store.as_ref()).await?)
    }

    /// Resolves one variable, following at most `max_alias_depth` aliases.
    pub async fn resolve(&self, variable_id: &VariableId, mode_id: &ModeId) -> DomainResult<ResolvedValue> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.resolve(variable_id, mode_id, self.config.max_alias_depth)?)
    }

    /// Exports `collection_name` in `mode_name`, following at most
    /// `max_alias_depth` aliases per variable.
    pub async fn export(&self, collection_name: &str, mode_name: &str) -> Result<ExportedCollection, SyncError> {
        let snapshot = self.snapshot().await?;
        let collection = snapshot
            .collection_by_name(collection_name)
            .ok_or_else(|| SyncError::MissingCollections {
                names: vec![collection_name.to_string()],
            })?;
        debug!(collection = %collection_name, mode = %mode_name, max_depth = self.config.max_alias_depth, "Exporting collection");
        Ok(export_collection(&snapshot, collection, mode_name, self.config.max_alias_depth))
    }

    async fn run_pass(&self, request: &SyncRequest, cache: &mut VariableCache) -> SyncResponse {
        let mut response = SyncResponse::default();
        let target = request.target_collection_name.trim();
        info!(collection = %target, tokens = request.desired_tokens.len(), "Starting synchronization pass");

        if target.is_empty() {
            response.errors.push("Target collection name is empty".to_string());
            return response;
        }

        let collections = match self.store.list_collections().await {
            Ok(collections) => collections,
            Err(e) => {
                response.errors.push(format!("Failed to list collections: {}", e));
                return response;
            }
        };

        let missing: Vec<String> = request
            .required_collections
            .iter()
            .filter(|name| !collections.iter().any(|c| &c.name == *name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            let err = SyncError::MissingCollections { names: missing };
            error!(collection = %target, error = %err, "Aborting pass before any write");
            response.errors.push(err.to_string());
            return response;
        }

        let collection = match collections.into_iter().find(|c| c.name == target) {
            Some(collection) => collection,
            None => match self.store.create_collection(target).await {
                Ok(collection) => {
                    info!(collection = %target, "Created collection");
                    collection
                }
                Err(e) => {
                    response.errors.push(format!("Failed to create collection '{}': {}", target, e));
                    return response;
                }
            },
        };

        let modes = self
            .modes
            .ensure_modes(self.store.as_ref(), &collection, &request.required_mode_names)
            .await;
        response.warnings.extend(modes.warnings.iter().cloned());

        if let Err(e) = cache.ensure_loaded(self.store.as_ref()).await {
            response.errors.push(format!("Failed to load variables: {}", e));
            return response;
        }

        let mut processed = HashSet::new();
        for token in &request.desired_tokens {
            match self
                .sync_token(token, &collection, &modes, cache, &mut processed, &mut response)
                .await
            {
                Ok(Some((kind, name))) => response.record(kind, &name),
                Ok(None) => {}
                Err(e) => {
                    warn!(token = %token.name, error = %e, "Token failed");
                    response.errors.push(format!("{}: {}", token.name, e));
                }
            }
        }

        self.apply_deletions(&collection, &request.deletions, cache, &mut response).await;

        info!(
            collection = %collection.name,
            created = response.created,
            updated = response.updated,
            deleted = response.deleted,
            errors = response.errors.len(),
            warnings = response.warnings.len(),
            "Synchronization pass finished"
        );
        response
    }

    /// Upserts one token. Returns the change it caused, if any.
    ///
    /// Failures of single mode assignments go into `response` and do not fail
    /// the token.
    async fn sync_token(
        &self,
        token: &DesiredToken,
        collection: &Collection,
        modes: &ModeReconciliation,
        cache: &mut VariableCache,
        processed: &mut HashSet<String>,
        response: &mut SyncResponse,
    ) -> Result<Option<(ChangeKind, String)>, SyncError> {
        let name = token_name(&token.name)?;
        if !processed.insert(name.clone()) {
            debug!(token = %name, "Skipping duplicate token");
            return Ok(None);
        }

        let (variable, created) = match cache.find_in_collection(&collection.id, &name).cloned() {
            Some(existing) if existing.variable_type != token.variable_type => {
                return Err(SyncError::TypeConflict {
                    token: name,
                    existing: existing.variable_type,
                    desired: token.variable_type,
                });
            }
            Some(existing) => (existing, false),
            None => {
                let variable = self
                    .store
                    .create_variable(&name, &collection.id, token.variable_type)
                    .await?;
                debug!(token = %name, id = %variable.id, "Created variable");
                cache.insert(variable.clone());
                (variable, true)
            }
        };

        let mut changed = false;
        if let Some(description) = &token.description {
            if variable.description != *description {
                match self.store.set_description(&variable.id, description).await {
                    Ok(()) => {
                        cache.record_description(&variable.id, description);
                        changed = true;
                    }
                    Err(e) => response
                        .errors
                        .push(format!("{}: failed to set description: {}", name, e)),
                }
            }
        }

        let context = TokenContext {
            name: &name,
            variable: &variable,
            collection,
        };
        for (mode_name, desired) in &token.per_mode {
            let Some(mode_id) = modes.mode_id(mode_name) else {
                warn!(token = %name, mode = %mode_name, "Mode not available");
                response.warnings.push(format!(
                    "{}: mode '{}' is not available in collection '{}'",
                    name, mode_name, collection.name
                ));
                continue;
            };

            let value = match desired_value(&context, mode_name, desired, cache, &mut response.warnings) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    response.errors.push(e.to_string());
                    continue;
                }
            };
            if variable.value_for_mode(mode_id) == Some(&value) {
                continue;
            }

            match self.store.set_value_for_mode(&variable.id, mode_id, value.clone()).await {
                Ok(()) => {
                    cache.record_value(&variable.id, mode_id, value);
                    changed = true;
                }
                Err(e) => {
                    warn!(token = %name, mode = %mode_name, error = %e, "Failed to set value");
                    response.errors.push(format!("{} mode '{}': {}", name, mode_name, e));
                }
            }
        }

        let kind = if created {
            Some(ChangeKind::Add)
        } else if changed {
            Some(ChangeKind::Update)
        } else {
            None
        };
        Ok(kind.map(|kind| (kind, name.clone())))
    }

    async fn apply_deletions(
        &self,
        collection: &Collection,
        targets: &[DeletionTarget],
        cache: &mut VariableCache,
        response: &mut SyncResponse,
    ) {
        for target in targets {
            match self.delete_one(collection, target, cache).await {
                Ok(name) => {
                    info!(collection = %collection.name, variable = %name, "Deleted variable");
                    response.record(ChangeKind::Delete, &name);
                }
                Err(e) => {
                    warn!(collection = %collection.name, error = %e, "Deletion failed");
                    response.errors.push(e.to_string());
                }
            }
        }
    }

    async fn delete_one(
        &self,
        collection: &Collection,
        target: &DeletionTarget,
        cache: &mut VariableCache,
    ) -> Result<String, SyncError> {
        let (id, name) = match target {
            DeletionTarget::Id { id } => {
                let name = cache.variable(id).map_or_else(|| id.to_string(), |v| v.name.clone());
                (id.clone(), name)
            }
            DeletionTarget::Name { name } => {
                let name = token_name(name)?;
                let variable = cache
                    .find_in_collection(&collection.id, &name)
                    .ok_or_else(|| SyncError::UnknownVariable {
                        collection: collection.name.clone(),
                        name: name.clone(),
                    })?;
                (variable.id.clone(), name)
            }
        };
        self.store.remove_variable(&id).await?;
        cache.remove(&id);
        Ok(name)
    }
}

/// Turns a desired value into a store value for one mode.
///
/// `Ok(None)` means the mode is left untouched; a warning has been recorded.
fn desired_value(
    context: &TokenContext<'_>,
    mode_name: &str,
    desired: &DesiredValue,
    cache: &VariableCache,
    warnings: &mut Vec<String>,
) -> Result<Option<VariableValue>, SyncError> {
    match desired {
        DesiredValue::Literal(raw) => raw
            .coerce(context.variable.variable_type)
            .map(|literal| Some(VariableValue::Literal(literal)))
            .map_err(|reason| SyncError::InvalidLiteral {
                token: context.name.to_string(),
                mode: mode_name.to_string(),
                reason,
            }),
        DesiredValue::Reference { reference } => {
            let target = parse_reference(reference).ok();
            Ok(alias_or_fallback(context, mode_name, reference, target.as_deref(), cache, warnings))
        }
        DesiredValue::Alias { alias } => {
            let target = token_name(alias).ok();
            Ok(alias_or_fallback(context, mode_name, alias, target.as_deref(), cache, warnings))
        }
    }
}

/// An alias to `target` if it exists, else a literal read from `raw`.
///
/// Exactly one warning is recorded whenever the alias cannot be made.
fn alias_or_fallback(
    context: &TokenContext<'_>,
    mode_name: &str,
    raw: &str,
    target: Option<&str>,
    cache: &VariableCache,
    warnings: &mut Vec<String>,
) -> Option<VariableValue> {
    let variable = context.variable;
    let found = target.and_then(|name| {
        cache.alias_target(name, variable.variable_type, &context.collection.id, &variable.id)
    });
    if let Some(found) = found {
        return Some(VariableValue::Alias(found.id.clone()));
    }

    match literal_fallback(raw, variable.variable_type) {
        Some(literal) => {
            warn!(token = %context.name, mode = %mode_name, reference = %raw, fallback = %literal, "Reference not found, using literal");
            warnings.push(format!(
                "{} mode '{}': reference '{}' not found, using literal {}",
                context.name, mode_name, raw, literal
            ));
            Some(VariableValue::Literal(literal))
        }
        None => {
            warn!(token = %context.name, mode = %mode_name, reference = %raw, "Reference not found, mode left unset");
            warnings.push(format!(
                "{} mode '{}': reference '{}' not found, value left unset",
                context.name, mode_name, raw
            ));
            None
        }
    }
}

/// Best-effort literal reading of an unresolved reference.
fn literal_fallback(raw: &str, variable_type: VariableType) -> Option<Literal> {
    let inner = raw.trim().trim_start_matches('{').trim_end_matches('}').trim();
    match variable_type {
        VariableType::Number => trailing_number(inner).map(Literal::Number),
        VariableType::String => (!inner.is_empty()).then(|| Literal::String(inner.to_string())),
        VariableType::Boolean => match inner.to_ascii_lowercase().as_str() {
            "true" => Some(Literal::Boolean(true)),
            "false" => Some(Literal::Boolean(false)),
            _ => None,
        },
        VariableType::Color => Color::from_str(inner).ok().map(Literal::Color),
    }
}
