//! In-process [`VariableStore`] used by tests and embedders.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use varsync_core::SyncConfig;

use super::VariableStore;
use crate::error::StoreError;
use crate::model::{Collection, CollectionId, Mode, ModeId, Variable, VariableId, VariableType, VariableValue};

#[derive(Debug, Default)]
struct StoreState {
    /// Creation order is preserved for both tables.
    collections: Vec<Collection>,
    variables: Vec<Variable>,
    failing_names: HashSet<String>,
    list_variables_calls: usize,
}

impl StoreState {
    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut Collection, StoreError> {
        self.collections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound { id: id.clone() })
    }

    fn collection(&self, id: &CollectionId) -> Result<&Collection, StoreError> {
        self.collections
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound { id: id.clone() })
    }

    fn variable(&self, id: &VariableId) -> Result<&Variable, StoreError> {
        self.variables
            .iter()
            .find(|v| &v.id == id)
            .ok_or_else(|| StoreError::VariableNotFound { id: id.clone() })
    }

    fn variable_mut(&mut self, id: &VariableId) -> Result<&mut Variable, StoreError> {
        self.variables
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| StoreError::VariableNotFound { id: id.clone() })
    }
}

/// A `tokio::sync::Mutex`-guarded store with uuid-based ids.
///
/// Behaves like the external store where it matters to the engine: fresh
/// collections carry one mode named after the configured default, an optional
/// cap limits the number of modes, writes are type-checked and names are
/// unique per collection.
#[derive(Debug)]
pub struct InMemoryVariableStore {
    state: Mutex<StoreState>,
    default_mode_name: String,
    mode_limit: Option<usize>,
}

impl Default for InMemoryVariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVariableStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            default_mode_name: SyncConfig::default().default_mode_name,
            mode_limit: None,
        }
    }

    /// Caps the number of modes per collection.
    pub fn with_mode_limit(mut self, limit: usize) -> Self {
        self.mode_limit = Some(limit);
        self
    }

    pub fn with_default_mode_name(mut self, name: impl Into<String>) -> Self {
        self.default_mode_name = name.into();
        self
    }

    /// Makes every later `create_variable` for `name` fail with a backend error.
    pub async fn fail_variable_creation(&self, name: &str) {
        self.state.lock().await.failing_names.insert(name.to_string());
    }

    /// How many times `list_variables` has been called.
    pub async fn list_variables_calls(&self) -> usize {
        self.state.lock().await.list_variables_calls
    }

    /// Variables of one collection in creation order. Not part of the port.
    pub async fn variables_in(&self, collection_id: &CollectionId) -> Vec<Variable> {
        self.state
            .lock()
            .await
            .variables
            .iter()
            .filter(|v| &v.collection_id == collection_id)
            .cloned()
            .collect()
    }

    fn new_id(prefix: &str) -> String {
        format!("{}:{}", prefix, Uuid::new_v4())
    }
}

#[async_trait]
impl VariableStore for InMemoryVariableStore {
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        Ok(self.state.lock().await.collections.clone())
    }

    async fn create_collection(&self, name: &str) -> Result<Collection, StoreError> {
        let mode = Mode {
            id: ModeId::new(Self::new_id("ModeId")),
            name: self.default_mode_name.clone(),
        };
        let collection = Collection {
            id: CollectionId::new(Self::new_id("VariableCollectionId")),
            name: name.to_string(),
            default_mode_id: mode.id.clone(),
            modes: vec![mode],
        };
        debug!(collection = %collection.name, id = %collection.id, "Created collection");
        self.state.lock().await.collections.push(collection.clone());
        Ok(collection)
    }

    async fn rename_mode(&self, collection_id: &CollectionId, mode_id: &ModeId, new_name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let collection = state.collection_mut(collection_id)?;
        let mode = collection
            .modes
            .iter_mut()
            .find(|m| &m.id == mode_id)
            .ok_or_else(|| StoreError::ModeNotFound {
                collection_id: collection_id.clone(),
                mode_id: mode_id.clone(),
            })?;
        mode.name = new_name.to_string();
        Ok(())
    }

    async fn add_mode(&self, collection_id: &CollectionId, name: &str) -> Result<ModeId, StoreError> {
        let mut state = self.state.lock().await;
        let collection = state.collection_mut(collection_id)?;
        if let Some(limit) = self.mode_limit {
            if collection.modes.len() >= limit {
                return Err(StoreError::ModeLimitReached {
                    collection: collection.name.clone(),
                    limit,
                });
            }
        }
        let id = ModeId::new(Self::new_id("ModeId"));
        collection.modes.push(Mode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn list_variables(&self, variable_type: Option<VariableType>) -> Result<Vec<Variable>, StoreError> {
        let mut state = self.state.lock().await;
        state.list_variables_calls += 1;
        Ok(state
            .variables
            .iter()
            .filter(|v| variable_type.map_or(true, |t| v.variable_type == t))
            .cloned()
            .collect())
    }

    async fn create_variable(
        &self,
        name: &str,
        collection_id: &CollectionId,
        variable_type: VariableType,
    ) -> Result<Variable, StoreError> {
        let mut state = self.state.lock().await;
        let collection_name = state.collection(collection_id)?.name.clone();
        if state.failing_names.contains(name) {
            return Err(StoreError::Backend(format!("Simulated failure creating '{}'", name)));
        }
        if state
            .variables
            .iter()
            .any(|v| &v.collection_id == collection_id && v.name == name)
        {
            return Err(StoreError::DuplicateName {
                collection: collection_name,
                name: name.to_string(),
            });
        }
        let variable = Variable {
            id: VariableId::new(Self::new_id("VariableID")),
            collection_id: collection_id.clone(),
            name: name.to_string(),
            variable_type,
            description: String::new(),
            values_by_mode: BTreeMap::new(),
        };
        state.variables.push(variable.clone());
        Ok(variable)
    }

    async fn set_value_for_mode(
        &self,
        variable_id: &VariableId,
        mode_id: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let variable = state.variable(variable_id)?;
        let collection = state.collection(&variable.collection_id)?;
        if collection.mode(mode_id).is_none() {
            return Err(StoreError::ModeNotFound {
                collection_id: collection.id.clone(),
                mode_id: mode_id.clone(),
            });
        }
        let actual = match &value {
            VariableValue::Literal(literal) => literal.variable_type(),
            VariableValue::Alias(target) => state.variable(target)?.variable_type,
        };
        if actual != variable.variable_type {
            return Err(StoreError::TypeMismatch {
                variable: variable_id.clone(),
                expected: variable.variable_type,
                actual,
            });
        }
        state
            .variable_mut(variable_id)?
            .values_by_mode
            .insert(mode_id.clone(), value);
        Ok(())
    }

    async fn set_description(&self, variable_id: &VariableId, description: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.variable_mut(variable_id)?.description = description.to_string();
        Ok(())
    }

    async fn get_variable_by_id(&self, id: &VariableId) -> Result<Option<Variable>, StoreError> {
        Ok(self.state.lock().await.variables.iter().find(|v| &v.id == id).cloned())
    }

    async fn remove_variable(&self, id: &VariableId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let index = state
            .variables
            .iter()
            .position(|v| &v.id == id)
            .ok_or_else(|| StoreError::VariableNotFound { id: id.clone() })?;
        state.variables.remove(index);
        Ok(())
    }
}
