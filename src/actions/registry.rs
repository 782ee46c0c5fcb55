//! Static action-id → handler table

use std::collections::HashMap;

use tracing::debug;

use super::catalog::{ActionEntry, CATALOG, Handler};

/// The dispatch table, built once at startup from the ordered catalog
///
/// Never mutated afterwards; a catalog reload rebuilds it wholesale. Lookup
/// is a total function: unknown ids simply return `None`.
pub struct ActionRegistry {
    table: HashMap<&'static str, Handler>,
}

impl ActionRegistry {
    /// Build the table from [`CATALOG`], skipping separators and the
    /// disabled sentinel
    pub fn from_catalog() -> Self {
        let mut table = HashMap::new();
        for ActionEntry { id, handler, .. } in CATALOG {
            if id.is_empty() {
                continue;
            }
            if let Some(handler) = handler {
                table.insert(*id, *handler);
            }
        }
        debug!(actions = table.len(), "Action registry built");
        Self { table }
    }

    /// Handler for an action id, if one is registered
    pub fn lookup(&self, id: &str) -> Option<Handler> {
        self.table.get(id).copied()
    }

    /// True if the id names a dispatchable action
    pub fn contains(&self, id: &str) -> bool {
        self.table.contains_key(id)
    }

    /// Number of dispatchable actions
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_action_is_registered() {
        let registry = ActionRegistry::from_catalog();
        for entry in CATALOG {
            if entry.id.is_empty() || entry.handler.is_none() {
                continue;
            }
            assert!(registry.contains(entry.id), "{} not registered", entry.id);
        }
    }

    #[test]
    fn test_disabled_and_separators_are_not_registered() {
        let registry = ActionRegistry::from_catalog();
        assert!(!registry.contains("disabled"));
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_lookup_is_total() {
        let registry = ActionRegistry::from_catalog();
        assert!(registry.lookup("action-from-an-uninstalled-extension").is_none());
        assert!(registry.len() > 20);
    }
}
