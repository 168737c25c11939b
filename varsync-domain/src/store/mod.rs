//! The variable store port.
//!
//! The engine never talks to a concrete store. Everything goes through
//! [`VariableStore`], held as `Arc<dyn VariableStore>`. Every call is an
//! `.await` point.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Collection, CollectionId, ModeId, Variable, VariableId, VariableType, VariableValue};

pub mod memory;

pub use memory::InMemoryVariableStore;

#[async_trait]
pub trait VariableStore: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError>;

    /// Creates a collection with a single store-named default mode.
    async fn create_collection(&self, name: &str) -> Result<Collection, StoreError>;

    async fn rename_mode(&self, collection_id: &CollectionId, mode_id: &ModeId, new_name: &str) -> Result<(), StoreError>;

    /// Appends a mode. Fails with [`StoreError::ModeLimitReached`] at capacity.
    async fn add_mode(&self, collection_id: &CollectionId, name: &str) -> Result<ModeId, StoreError>;

    /// All variables across all collections, optionally filtered by type.
    async fn list_variables(&self, variable_type: Option<VariableType>) -> Result<Vec<Variable>, StoreError>;

    async fn create_variable(
        &self,
        name: &str,
        collection_id: &CollectionId,
        variable_type: VariableType,
    ) -> Result<Variable, StoreError>;

    async fn set_value_for_mode(
        &self,
        variable_id: &VariableId,
        mode_id: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError>;

    async fn set_description(&self, variable_id: &VariableId, description: &str) -> Result<(), StoreError>;

    async fn get_variable_by_id(&self, id: &VariableId) -> Result<Option<Variable>, StoreError>;

    async fn remove_variable(&self, id: &VariableId) -> Result<(), StoreError>;

    async fn find_collection_by_name(&self, name: &str) -> Result<Option<Collection>, StoreError> {
        Ok(self.list_collections().await?.into_iter().find(|c| c.name == name))
    }
}
