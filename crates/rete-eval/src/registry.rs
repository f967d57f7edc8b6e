//! Registry of evaluator definitions, keyed by operator id
//!
//! The rule compiler resolves an operator name to the definition that owns
//! it, then asks that definition for the evaluator matching the declared
//! field type.

use std::collections::HashMap;
use std::sync::Arc;

use rete_types::ValueType;

use crate::definition::EvaluatorDefinition;
use crate::definitions;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::operator::Operator;

/// Configuration key prefix: `evaluator.<operator id> = <definition name>`
pub const EVALUATOR_KEY_PREFIX: &str = "evaluator.";

/// Maps operator ids to the definitions providing them
#[derive(Debug, Default, Clone)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, Arc<dyn EvaluatorDefinition>>,
}

impl DefinitionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in definition
    pub fn with_builtin_definitions() -> Self {
        let mut registry = Self::new();
        for definition in definitions::builtin_definitions() {
            // Built-in definitions never share an operator id
            if let Err(e) = registry.add_definition(definition) {
                log::warn!("skipping built-in definition: {e}");
            }
        }
        registry
    }

    /// Register a definition under every operator id it provides
    ///
    /// Registering the same definition again is a no-op. An id already owned
    /// by a differently named definition is rejected, and nothing is added.
    pub fn add_definition(&mut self, definition: Arc<dyn EvaluatorDefinition>) -> EvalResult<()> {
        for id in definition.evaluator_ids() {
            let owner = self.definitions.get(*id);
            if let Some(existing) = owner.filter(|e| e.name() != definition.name()) {
                return Err(EvalError::ConflictingDefinition {
                    id: (*id).to_string(),
                    existing: existing.name().to_string(),
                });
            }
        }
        for id in definition.evaluator_ids() {
            self.definitions
                .entry((*id).to_string())
                .or_insert_with(|| definition.clone());
        }
        log::debug!(
            "added evaluator definition '{}' for {:?}",
            definition.name(),
            definition.evaluator_ids()
        );
        Ok(())
    }

    /// Apply `evaluator.<id> = <definition name>` entries
    ///
    /// Keys without the `evaluator.` prefix are ignored. The named
    /// definition must be a built-in one and must provide `<id>`.
    pub fn configure<I, K, V>(&mut self, properties: I) -> EvalResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in properties {
            let key = key.as_ref();
            let Some(id) = key.strip_prefix(EVALUATOR_KEY_PREFIX) else {
                continue;
            };
            let name = value.as_ref().trim();
            let Some(definition) = definitions::builtin_definition(name) else {
                log::warn!("unknown evaluator definition '{name}' for '{key}'");
                return Err(EvalError::invalid_configuration(
                    key,
                    format!("unknown evaluator definition '{name}'"),
                ));
            };
            if !definition.evaluator_ids().iter().any(|provided| *provided == id) {
                log::warn!("definition '{name}' does not provide operator '{id}'");
                return Err(EvalError::invalid_configuration(
                    key,
                    format!("definition '{name}' does not provide operator '{id}'"),
                ));
            }
            self.add_definition(definition)?;
        }
        Ok(())
    }

    /// Get the definition owning an operator id
    pub fn get_definition(&self, operator_id: &str) -> Option<Arc<dyn EvaluatorDefinition>> {
        self.definitions.get(operator_id).cloned()
    }

    /// Get the definition owning an operator
    pub fn get_evaluator_definition(&self, operator: Operator) -> Option<Arc<dyn EvaluatorDefinition>> {
        self.get_definition(operator.operator_string())
    }

    /// Every registered operator id, sorted
    pub fn evaluator_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve an operator name and field type to an evaluator
    pub fn get_evaluator(
        &self,
        value_type: ValueType,
        operator_id: &str,
        negated: bool,
        parameter_text: Option<&str>,
    ) -> Option<Arc<dyn Evaluator>> {
        self.get_definition(operator_id)?
            .get_evaluator_for(value_type, operator_id, negated, parameter_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::SoundslikeEvaluatorsDefinition;
    use crate::definitions::soundslike;

    #[test]
    fn test_builtin_registry() {
        let registry = DefinitionRegistry::with_builtin_definitions();
        assert_eq!(registry.evaluator_ids(), vec!["soundslike"]);

        let ops = soundslike::register();
        let definition = registry.get_evaluator_definition(ops.not_soundslike).unwrap();
        assert_eq!(definition.name(), SoundslikeEvaluatorsDefinition::NAME);

        let evaluator = registry
            .get_evaluator(ValueType::String, "soundslike", true, None)
            .unwrap();
        assert_eq!(evaluator.operator(), ops.not_soundslike);
        assert!(registry.get_evaluator(ValueType::Integer, "soundslike", false, None).is_none());
        assert!(registry.get_evaluator(ValueType::String, "matches", false, None).is_none());
    }

    #[test]
    fn test_adding_same_definition_twice_is_noop() {
        let mut registry = DefinitionRegistry::new();
        registry.add_definition(Arc::new(SoundslikeEvaluatorsDefinition::new())).unwrap();
        registry.add_definition(Arc::new(SoundslikeEvaluatorsDefinition::new())).unwrap();
        assert_eq!(registry.evaluator_ids().len(), 1);
    }

    #[test]
    fn test_configure_from_properties() {
        let mut registry = DefinitionRegistry::new();
        registry
            .configure([
                ("evaluator.soundslike", "soundslike"),
                ("unrelated.key", "ignored"),
            ])
            .unwrap();
        assert!(registry.get_definition("soundslike").is_some());
    }

    #[test]
    fn test_configure_rejects_unknown_definition() {
        let mut registry = DefinitionRegistry::new();
        let err = registry
            .configure([("evaluator.soundslike", "phonetic")])
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfiguration { .. }));

        let err = registry
            .configure([("evaluator.matches", "soundslike")])
            .unwrap_err();
        assert!(err.to_string().contains("does not provide"));
    }
}
