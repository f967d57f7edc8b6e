//! Built-in evaluator definitions

pub mod soundslike;

pub use soundslike::SoundslikeEvaluatorsDefinition;

use std::sync::Arc;

use crate::definition::EvaluatorDefinition;
use crate::evaluator::Evaluator;

/// Canonical instances of every built-in evaluator
pub(crate) fn builtin_evaluators() -> Vec<Arc<dyn Evaluator>> {
    vec![
        soundslike::STRING_SOUNDS_LIKE.clone(),
        soundslike::STRING_NOT_SOUNDS_LIKE.clone(),
    ]
}

/// Build a built-in definition from its configuration name
pub fn builtin_definition(name: &str) -> Option<Arc<dyn EvaluatorDefinition>> {
    match name {
        SoundslikeEvaluatorsDefinition::NAME => Some(Arc::new(SoundslikeEvaluatorsDefinition::new())),
        _ => None,
    }
}

/// One instance of every built-in definition
pub fn builtin_definitions() -> Vec<Arc<dyn EvaluatorDefinition>> {
    vec![Arc::new(SoundslikeEvaluatorsDefinition::new())]
}
