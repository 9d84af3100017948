use crate::dynamic_html::DynamicHtmlFactory;
use crate::handler::HandlerFactory;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps handler keys to the factories that build them. Registering a
/// function with a key not present here is rejected.
pub struct BuiltinRegistry {
    factories: HashMap<&'static str, Arc<dyn HandlerFactory>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// All handlers shipped with the harness.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DynamicHtmlFactory));
        registry
    }

    pub fn register(&mut self, factory: Arc<dyn HandlerFactory>) {
        self.factories.insert(factory.key(), factory);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn HandlerFactory>> {
        self.factories.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.factories.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_dynamic_html() {
        let registry = BuiltinRegistry::with_defaults();
        assert!(registry.contains("dynamic-html"));
        assert!(registry.get("dynamic-html").is_some());
        assert_eq!(registry.keys(), vec!["dynamic-html"]);
    }

    #[test]
    fn unknown_key_is_absent() {
        let registry = BuiltinRegistry::with_defaults();
        assert!(!registry.contains("no-such-handler"));
        assert!(registry.get("no-such-handler").is_none());
    }
}
