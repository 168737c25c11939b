//! Alias resolution over an immutable snapshot of the store.
//!
//! A variable's value in a mode is either a literal or an alias. Resolution
//! follows aliases across collections until a literal is found. When an alias
//! crosses into another collection the mode to read there is the one with the
//! same *name* as the current mode, else the target collection's default mode.

use std::collections::HashMap;
use tracing::trace;

use crate::error::ResolveError;
use crate::model::{Collection, CollectionId, Literal, ModeId, Variable, VariableId, VariableValue};

/// The literal an alias chain ends in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub literal: Literal,
    /// Alias hops followed. Zero for a direct literal.
    pub hops: u8,
    /// The variable that holds the literal.
    pub source: VariableId,
}

/// Collections and variables indexed by id.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    collections: HashMap<CollectionId, Collection>,
    variables: HashMap<VariableId, Variable>,
}

impl GraphSnapshot {
    pub fn new(collections: impl IntoIterator<Item = Collection>, variables: impl IntoIterator<Item = Variable>) -> Self {
        Self {
            collections: collections.into_iter().map(|c| (c.id.clone(), c)).collect(),
            variables: variables.into_iter().map(|v| (v.id.clone(), v)).collect(),
        }
    }

    pub fn collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn collection_by_name(&self, name: &str) -> Option<&Collection> {
        self.collections.values().find(|c| c.name == name)
    }

    pub fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Variables of one collection sorted by name.
    pub fn variables_in(&self, collection_id: &CollectionId) -> Vec<&Variable> {
        let mut variables: Vec<&Variable> = self
            .variables
            .values()
            .filter(|v| &v.collection_id == collection_id)
            .collect();
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        variables
    }

    /// Resolves `variable_id` in `mode_id` to a literal.
    ///
    /// At most `max_depth` alias hops are followed. A chain revisiting a
    /// variable fails with [`ResolveError::CycleDetected`] right away.
    pub fn resolve(&self, variable_id: &VariableId, mode_id: &ModeId, max_depth: u8) -> Result<ResolvedValue, ResolveError> {
        let mut current = self
            .variable(variable_id)
            .ok_or_else(|| ResolveError::VariableNotFound { id: variable_id.clone() })?;
        let mut mode_id = mode_id.clone();
        let mut path = vec![current.id.clone()];
        let mut hops: u8 = 0;

        loop {
            let value = current.value_for_mode(&mode_id).ok_or_else(|| ResolveError::MissingValue {
                variable: current.id.clone(),
                mode: mode_id.clone(),
            })?;

            let target_id = match value {
                VariableValue::Literal(literal) => {
                    if literal.variable_type() != current.variable_type {
                        return Err(ResolveError::TypeMismatch {
                            variable: current.id.clone(),
                            expected: current.variable_type,
                            actual: literal.variable_type(),
                        });
                    }
                    return Ok(ResolvedValue {
                        literal: literal.clone(),
                        hops,
                        source: current.id.clone(),
                    });
                }
                VariableValue::Alias(target_id) => target_id,
            };

            if path.contains(target_id) {
                path.push(target_id.clone());
                return Err(ResolveError::CycleDetected { path });
            }
            if hops >= max_depth {
                return Err(ResolveError::DepthExceeded {
                    start: variable_id.clone(),
                    max_depth,
                });
            }

            let mode_name = self
                .collection(&current.collection_id)
                .ok_or_else(|| ResolveError::CollectionNotFound {
                    id: current.collection_id.clone(),
                })?
                .mode(&mode_id)
                .map(|m| m.name.clone());
            let target = self
                .variable(target_id)
                .ok_or_else(|| ResolveError::VariableNotFound { id: target_id.clone() })?;
            let target_collection = self
                .collection(&target.collection_id)
                .ok_or_else(|| ResolveError::CollectionNotFound {
                    id: target.collection_id.clone(),
                })?;

            mode_id = mode_name
                .as_deref()
                .and_then(|name| target_collection.mode_by_name(name))
                .map(|m| m.id.clone())
                .unwrap_or_else(|| target_collection.default_mode_id.clone());
            trace!(from = %current.id, to = %target.id, mode = %mode_id, "Following alias");

            path.push(target.id.clone());
            hops += 1;
            current = target;
        }
    }
}
