//! Per-session cache of every variable known to exist.
//!
//! A [`VariableCache`] is created for one pass and handed down by `&mut`.
//! The first read fills it from the store; writes made during the pass are
//! recorded in it so later lookups see them without another round-trip.

use std::collections::HashMap;
use tracing::debug;

use crate::error::StoreError;
use crate::model::{CollectionId, ModeId, Variable, VariableId, VariableType, VariableValue};
use crate::store::VariableStore;

#[derive(Debug, Default)]
struct Entries {
    /// Store order.
    variables: Vec<Variable>,
    by_id: HashMap<VariableId, usize>,
    by_name: HashMap<String, Vec<VariableId>>,
}

impl Entries {
    fn from_variables(variables: Vec<Variable>) -> Self {
        let mut entries = Entries::default();
        for variable in variables {
            entries.push(variable);
        }
        entries
    }

    fn push(&mut self, variable: Variable) {
        self.by_name
            .entry(variable.name.clone())
            .or_default()
            .push(variable.id.clone());
        self.by_id.insert(variable.id.clone(), self.variables.len());
        self.variables.push(variable);
    }

    fn get_mut(&mut self, id: &VariableId) -> Option<&mut Variable> {
        let index = *self.by_id.get(id)?;
        self.variables.get_mut(index)
    }

    fn rebuild_index(&mut self) {
        let variables = std::mem::take(&mut self.variables);
        *self = Entries::from_variables(variables);
    }
}

#[derive(Debug, Default)]
pub struct VariableCache {
    entries: Option<Entries>,
}

impl VariableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything; the next read goes back to the store.
    pub fn invalidate(&mut self) {
        self.entries = None;
    }

    pub fn is_populated(&self) -> bool {
        self.entries.is_some()
    }

    /// Fills the cache from the store unless already populated.
    pub async fn ensure_loaded(&mut self, store: &dyn VariableStore) -> Result<(), StoreError> {
        if self.entries.is_none() {
            let variables = store.list_variables(None).await?;
            debug!(count = variables.len(), "Loaded variable cache");
            self.entries = Some(Entries::from_variables(variables));
        }
        Ok(())
    }

    /// Every known variable, loading from the store on first use.
    pub async fn get_all(&mut self, store: &dyn VariableStore) -> Result<Vec<Variable>, StoreError> {
        self.ensure_loaded(store).await?;
        Ok(self.variables().cloned().collect())
    }

    /// Cached variables in store order. Empty until loaded.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().flat_map(|e| e.variables.iter())
    }

    pub fn variable(&self, id: &VariableId) -> Option<&Variable> {
        let entries = self.entries.as_ref()?;
        entries.by_id.get(id).and_then(|&i| entries.variables.get(i))
    }

    /// Variables named `name` in any collection, in store order.
    pub fn named(&self, name: &str) -> Vec<&Variable> {
        let Some(entries) = self.entries.as_ref() else {
            return Vec::new();
        };
        entries
            .by_name
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.variable(id)).collect())
            .unwrap_or_default()
    }

    pub fn find_in_collection(&self, collection_id: &CollectionId, name: &str) -> Option<&Variable> {
        self.named(name).into_iter().find(|v| &v.collection_id == collection_id)
    }

    /// The variable an alias named `name` should point at.
    ///
    /// Only variables of `variable_type` other than `exclude` qualify. A match
    /// outside `home` wins over one inside it.
    pub fn alias_target(
        &self,
        name: &str,
        variable_type: VariableType,
        home: &CollectionId,
        exclude: &VariableId,
    ) -> Option<&Variable> {
        let candidates: Vec<&Variable> = self
            .named(name)
            .into_iter()
            .filter(|v| v.variable_type == variable_type && &v.id != exclude)
            .collect();
        candidates
            .iter()
            .find(|v| &v.collection_id != home)
            .or_else(|| candidates.first())
            .copied()
    }

    /// Records a variable created during the pass.
    pub fn insert(&mut self, variable: Variable) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(variable);
        }
    }

    pub fn record_value(&mut self, id: &VariableId, mode_id: &ModeId, value: VariableValue) {
        if let Some(variable) = self.entries.as_mut().and_then(|e| e.get_mut(id)) {
            variable.values_by_mode.insert(mode_id.clone(), value);
        }
    }

    pub fn record_description(&mut self, id: &VariableId, description: &str) {
        if let Some(variable) = self.entries.as_mut().and_then(|e| e.get_mut(id)) {
            variable.description = description.to_string();
        }
    }

    pub fn remove(&mut self, id: &VariableId) -> Option<Variable> {
        let entries = self.entries.as_mut()?;
        let index = entries.by_id.get(id).copied()?;
        let removed = entries.variables.remove(index);
        entries.rebuild_index();
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Literal;
    use crate::store::InMemoryVariableStore;

    #[tokio::test]
    async fn test_loads_once_until_invalidated() {
        let store = InMemoryVariableStore::new();
        let collection = store.create_collection("Primitives").await.unwrap();
        store.create_variable("brand/500", &collection.id, VariableType::Color).await.unwrap();

        let mut cache = VariableCache::new();
        assert!(!cache.is_populated());
        assert_eq!(cache.get_all(&store).await.unwrap().len(), 1);
        assert_eq!(cache.get_all(&store).await.unwrap().len(), 1);
        assert_eq!(store.list_variables_calls().await, 1);

        cache.invalidate();
        assert!(cache.variables().next().is_none());
        cache.ensure_loaded(&store).await.unwrap();
        assert_eq!(store.list_variables_calls().await, 2);
    }

    #[tokio::test]
    async fn test_inserted_variables_are_visible_without_refetch() {
        let store = InMemoryVariableStore::new();
        let collection = store.create_collection("Semantic").await.unwrap();
        let mut cache = VariableCache::new();
        cache.ensure_loaded(&store).await.unwrap();

        let created = store
            .create_variable("bg/page", &collection.id, VariableType::Color)
            .await
            .unwrap();
        cache.insert(created.clone());

        assert_eq!(cache.find_in_collection(&collection.id, "bg/page"), Some(&created));
        assert_eq!(store.list_variables_calls().await, 1);
    }

    #[tokio::test]
    async fn test_alias_target_prefers_other_collections() {
        let store = InMemoryVariableStore::new();
        let semantic = store.create_collection("Semantic").await.unwrap();
        let primitives = store.create_collection("Primitives").await.unwrap();
        let local = store.create_variable("brand/500", &semantic.id, VariableType::Color).await.unwrap();
        let remote = store.create_variable("brand/500", &primitives.id, VariableType::Color).await.unwrap();
        let token = store.create_variable("bg/page", &semantic.id, VariableType::Color).await.unwrap();

        let mut cache = VariableCache::new();
        cache.ensure_loaded(&store).await.unwrap();

        let target = cache.alias_target("brand/500", VariableType::Color, &semantic.id, &token.id);
        assert_eq!(target.map(|v| &v.id), Some(&remote.id));

        cache.remove(&remote.id);
        let target = cache.alias_target("brand/500", VariableType::Color, &semantic.id, &token.id);
        assert_eq!(target.map(|v| &v.id), Some(&local.id));

        assert!(cache
            .alias_target("bg/page", VariableType::Color, &semantic.id, &token.id)
            .is_none());
        assert!(cache
            .alias_target("brand/500", VariableType::Number, &semantic.id, &token.id)
            .is_none());
    }

    #[tokio::test]
    async fn test_record_value_and_remove() {
        let store = InMemoryVariableStore::new();
        let collection = store.create_collection("Primitives").await.unwrap();
        let a = store.create_variable("spacing/1", &collection.id, VariableType::Number).await.unwrap();
        let b = store.create_variable("spacing/2", &collection.id, VariableType::Number).await.unwrap();

        let mut cache = VariableCache::new();
        cache.ensure_loaded(&store).await.unwrap();
        cache.record_value(&b.id, &collection.default_mode_id, Literal::Number(8.0).into());
        cache.record_description(&b.id, "Two units");

        assert_eq!(cache.remove(&a.id).map(|v| v.name), Some("spacing/1".to_string()));
        assert!(cache.variable(&a.id).is_none());
        let b = cache.variable(&b.id).unwrap();
        assert_eq!(b.description, "Two units");
        assert_eq!(
            b.value_for_mode(&collection.default_mode_id),
            Some(&VariableValue::Literal(Literal::Number(8.0)))
        );
    }
}
