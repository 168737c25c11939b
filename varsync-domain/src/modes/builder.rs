//! Reconciles required mode names against a collection's existing modes.

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::model::{Collection, Mode, ModeId};
use crate::store::VariableStore;

/// Result of [`ModeMatrixBuilder::ensure_modes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeReconciliation {
    /// Every mode of the collection afterwards, in collection order.
    pub modes: Vec<(String, ModeId)>,
    /// The name the sole default mode was renamed to, if that happened.
    pub renamed: Option<String>,
    pub added: Vec<String>,
    pub warnings: Vec<String>,
}

impl ModeReconciliation {
    pub fn mode_id(&self, name: &str) -> Option<&ModeId> {
        self.modes.iter().find(|(n, _)| n == name).map(|(_, id)| id)
    }
}

/// Makes sure a collection exposes a list of mode names without ever
/// removing or reordering what already exists.
#[derive(Debug, Clone)]
pub struct ModeMatrixBuilder {
    default_mode_name: String,
}

impl ModeMatrixBuilder {
    /// `default_mode_name` is what the store calls the sole mode of a fresh
    /// collection.
    pub fn new(default_mode_name: impl Into<String>) -> Self {
        Self {
            default_mode_name: default_mode_name.into(),
        }
    }

    /// Ensures every name in `required` exists on `collection`.
    ///
    /// A collection whose only mode still carries the store default name gets
    /// that mode renamed to the first missing name. Later names are appended.
    /// Store refusals, including the mode cap, become warnings.
    pub async fn ensure_modes(
        &self,
        store: &dyn VariableStore,
        collection: &Collection,
        required: &[String],
    ) -> ModeReconciliation {
        let mut modes: Vec<Mode> = collection.modes.clone();
        let mut renamed = None;
        let mut added = Vec::new();
        let mut warnings = Vec::new();
        let mut rename_available = modes.len() == 1 && modes[0].name == self.default_mode_name;

        for name in required {
            let name = name.trim();
            if name.is_empty() || modes.iter().any(|m| m.name == name) {
                continue;
            }

            if rename_available {
                rename_available = false;
                let mode_id = modes[0].id.clone();
                match store.rename_mode(&collection.id, &mode_id, name).await {
                    Ok(()) => {
                        info!(collection = %collection.name, mode = %name, "Renamed default mode");
                        modes[0].name = name.to_string();
                        renamed = Some(name.to_string());
                        continue;
                    }
                    Err(e) => {
                        warn!(collection = %collection.name, mode = %name, error = %e, "Failed to rename default mode");
                        warnings.push(format!(
                            "Could not rename default mode of '{}' to '{}': {}",
                            collection.name, name, e
                        ));
                    }
                }
            }

            match store.add_mode(&collection.id, name).await {
                Ok(id) => {
                    debug!(collection = %collection.name, mode = %name, "Added mode");
                    modes.push(Mode {
                        id,
                        name: name.to_string(),
                    });
                    added.push(name.to_string());
                }
                Err(StoreError::ModeLimitReached { limit, .. }) => {
                    warn!(collection = %collection.name, mode = %name, limit, "Mode limit reached");
                    warnings.push(format!(
                        "Mode limit of {} reached in collection '{}': mode '{}' was not created",
                        limit, collection.name, name
                    ));
                }
                Err(e) => {
                    warn!(collection = %collection.name, mode = %name, error = %e, "Failed to add mode");
                    warnings.push(format!("Could not add mode '{}' to '{}': {}", name, collection.name, e));
                }
            }
        }

        ModeReconciliation {
            modes: modes.into_iter().map(|m| (m.name, m.id)).collect(),
            renamed,
            added,
            warnings,
        }
    }
}
