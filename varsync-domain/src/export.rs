//! Export of a collection's resolved values as nested JSON.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Collection, Literal};
use crate::naming::{kebab_to_camel, STORE_SEPARATOR};
use crate::resolver::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedToken {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCollection {
    pub collection: String,
    pub mode: String,
    /// Path segments as nested camelCase keys, literals at the leaves.
    pub tokens: Value,
    pub unresolved: Vec<UnresolvedToken>,
}

fn literal_to_json(literal: &Literal) -> Value {
    match literal {
        Literal::Color(color) => Value::String(color.to_hex_with_alpha()),
        Literal::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Bool(*b),
    }
}

/// Inserts `value` at `keys`. Fails when a leaf and a group share a path.
fn insert_nested(root: &mut Map<String, Value>, keys: &[String], value: Value) -> Result<(), String> {
    let Some((leaf, groups)) = keys.split_last() else {
        return Err("empty name".to_string());
    };
    let mut node = root;
    for key in groups {
        let entry = node
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        node = match entry {
            Value::Object(map) => map,
            _ => return Err(format!("'{}' is already a token", key)),
        };
    }
    if node.contains_key(leaf) {
        return Err(format!("'{}' is already a group", leaf));
    }
    node.insert(leaf.clone(), value);
    Ok(())
}

/// Resolves every variable of `collection` in `mode_name` (or the default
/// mode when no mode has that name) and nests the results.
pub fn export_collection(
    snapshot: &GraphSnapshot,
    collection: &Collection,
    mode_name: &str,
    max_depth: u8,
) -> ExportedCollection {
    let mode = collection
        .mode_by_name(mode_name)
        .or_else(|| collection.default_mode())
        .cloned();

    let mut tokens = Map::new();
    let mut unresolved = Vec::new();
    for variable in snapshot.variables_in(&collection.id) {
        let Some(mode) = &mode else {
            unresolved.push(UnresolvedToken {
                name: variable.name.clone(),
                reason: format!("collection has no mode '{}'", mode_name),
            });
            continue;
        };
        let keys: Vec<String> = variable.name.split(STORE_SEPARATOR).map(kebab_to_camel).collect();
        let outcome = snapshot
            .resolve(&variable.id, &mode.id, max_depth)
            .map_err(|e| e.to_string())
            .and_then(|resolved| insert_nested(&mut tokens, &keys, literal_to_json(&resolved.literal)));
        if let Err(reason) = outcome {
            debug!(variable = %variable.name, %reason, "Variable left out of export");
            unresolved.push(UnresolvedToken {
                name: variable.name.clone(),
                reason,
            });
        }
    }

    ExportedCollection {
        collection: collection.name.clone(),
        mode: mode.map_or_else(|| mode_name.to_string(), |m| m.name),
        tokens: Value::Object(tokens),
        unresolved,
    }
}
