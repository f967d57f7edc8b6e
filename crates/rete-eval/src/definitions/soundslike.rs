//! The `soundslike` operator family
//!
//! `a soundslike b` holds when both strings have the same Soundex code.
//! Null policy: when either operand is null (or not a string) the comparison
//! is false for both `soundslike` and `not soundslike`. For two non-null
//! strings the negated form is the exact complement.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use rete_types::{FactValue, ValueType};

use crate::cache::EvaluatorCache;
use crate::definition::{EvaluatorDefinition, Target};
use crate::error::EvalResult;
use crate::evaluator::{BaseEvaluator, Comparison, Evaluator, EvaluatorId};
use crate::operator::Operator;
use crate::soundex::soundex;

/// Symbolic operator name
pub const SOUNDSLIKE: &str = "soundslike";

const SUPPORTED_IDS: [&str; 1] = [SOUNDSLIKE];

/// The canonical operators of this family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundslikeOperators {
    pub soundslike: Operator,
    pub not_soundslike: Operator,
}

static OPERATORS: Mutex<Option<SoundslikeOperators>> = Mutex::new(None);

/// Register both operators, once per process
///
/// Every later call returns the operators registered by the first one.
pub fn register() -> SoundslikeOperators {
    let mut guard = OPERATORS.lock();
    if let Some(ops) = *guard {
        return ops;
    }
    let ops = SoundslikeOperators {
        soundslike: Operator::add_operator_to_registry(SOUNDSLIKE, false),
        not_soundslike: Operator::add_operator_to_registry(SOUNDSLIKE, true),
    };
    log::debug!("registered '{}' and '{}'", ops.soundslike, ops.not_soundslike);
    *guard = Some(ops);
    ops
}

/// Canonical `soundslike` evaluator
pub static STRING_SOUNDS_LIKE: Lazy<Arc<dyn Evaluator>> =
    Lazy::new(|| Arc::new(StringSoundsLikeEvaluator::new()));

/// Canonical `not soundslike` evaluator
pub static STRING_NOT_SOUNDS_LIKE: Lazy<Arc<dyn Evaluator>> =
    Lazy::new(|| Arc::new(StringNotSoundsLikeEvaluator::new()));

/// `None` when either operand is null or not a string
fn sounds_like(value: &FactValue, other: &FactValue) -> Option<bool> {
    let value = value.as_str()?;
    let other = other.as_str()?;
    let code = match soundex(value) {
        Some(code) => code,
        None => return Some(false),
    };
    Some(soundex(other).is_some_and(|other_code| other_code == code))
}

#[derive(Debug)]
pub struct StringSoundsLikeEvaluator {
    base: BaseEvaluator,
}

impl StringSoundsLikeEvaluator {
    pub const ID: &'static str = "string-soundslike";

    pub fn new() -> Self {
        Self {
            base: BaseEvaluator::new(ValueType::String, register().soundslike),
        }
    }
}

impl Default for StringSoundsLikeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison for StringSoundsLikeEvaluator {
    fn evaluator_id(&self) -> EvaluatorId {
        EvaluatorId::new(Self::ID)
    }

    fn base(&self) -> &BaseEvaluator {
        &self.base
    }

    fn compare(&self, value: &FactValue, other: &FactValue) -> bool {
        sounds_like(value, other) == Some(true)
    }
}

impl fmt::Display for StringSoundsLikeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strings sound alike")
    }
}

#[derive(Debug)]
pub struct StringNotSoundsLikeEvaluator {
    base: BaseEvaluator,
}

impl StringNotSoundsLikeEvaluator {
    pub const ID: &'static str = "string-not-soundslike";

    pub fn new() -> Self {
        Self {
            base: BaseEvaluator::new(ValueType::String, register().not_soundslike),
        }
    }
}

impl Default for StringNotSoundsLikeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison for StringNotSoundsLikeEvaluator {
    fn evaluator_id(&self) -> EvaluatorId {
        EvaluatorId::new(Self::ID)
    }

    fn base(&self) -> &BaseEvaluator {
        &self.base
    }

    // null is never "not soundslike" either
    fn compare(&self, value: &FactValue, other: &FactValue) -> bool {
        sounds_like(value, other) == Some(false)
    }
}

impl fmt::Display for StringNotSoundsLikeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strings not sound alike")
    }
}

/// Definition contributing `soundslike` / `not soundslike` for strings and
/// untyped objects
#[derive(Debug, Clone)]
pub struct SoundslikeEvaluatorsDefinition {
    evaluators: EvaluatorCache,
}

impl SoundslikeEvaluatorsDefinition {
    /// Configuration name
    pub const NAME: &'static str = "soundslike";

    pub fn new() -> Self {
        let ops = register();
        let evaluators = EvaluatorCache::from_bindings([
            (ValueType::String, ops.soundslike, STRING_SOUNDS_LIKE.clone()),
            (ValueType::String, ops.not_soundslike, STRING_NOT_SOUNDS_LIKE.clone()),
            (ValueType::Object, ops.soundslike, STRING_SOUNDS_LIKE.clone()),
            (ValueType::Object, ops.not_soundslike, STRING_NOT_SOUNDS_LIKE.clone()),
        ])
        .unwrap_or_else(|e| {
            log::error!("invalid soundslike evaluator table: {e}");
            EvaluatorCache::new()
        });
        Self { evaluators }
    }

    pub fn evaluator_cache(&self) -> &EvaluatorCache {
        &self.evaluators
    }
}

impl Default for SoundslikeEvaluatorsDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluatorDefinition for SoundslikeEvaluatorsDefinition {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluator_ids(&self) -> &[&'static str] {
        &SUPPORTED_IDS
    }

    fn is_negatable(&self) -> bool {
        true
    }

    fn target(&self) -> Target {
        Target::Fact
    }

    fn supports_type(&self, value_type: ValueType) -> bool {
        self.evaluators.supports_type(value_type)
    }

    fn get_evaluator(&self, value_type: ValueType, operator: Operator) -> Option<Arc<dyn Evaluator>> {
        self.evaluators.get_evaluator(value_type, operator)
    }

    fn write_to(&self, writer: &mut dyn Write) -> EvalResult<()> {
        self.evaluators.write_to(writer)
    }

    // Reads exactly one document, so several definitions can share a stream
    fn read_from(&mut self, reader: &mut dyn Read) -> EvalResult<()> {
        self.evaluators = EvaluatorCache::read_from(reader)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let first = register();
        let second = register();
        assert_eq!(first, second);
        assert_ne!(first.soundslike, first.not_soundslike);
        assert_eq!(first.soundslike.operator_string(), first.not_soundslike.operator_string());
        assert!(first.not_soundslike.is_negated());
    }

    #[test]
    fn test_sounds_like_null_policy() {
        let robert = FactValue::string("Robert");
        assert_eq!(sounds_like(&robert, &FactValue::string("Rupert")), Some(true));
        assert_eq!(sounds_like(&robert, &FactValue::Null), None);
        assert_eq!(sounds_like(&FactValue::Null, &robert), None);
        assert_eq!(sounds_like(&robert, &FactValue::Integer(1)), None);
        assert_eq!(sounds_like(&FactValue::string("42"), &FactValue::string("42")), Some(false));
    }

    #[test]
    fn test_evaluator_identity() {
        let ops = register();
        assert_eq!(STRING_SOUNDS_LIKE.operator(), ops.soundslike);
        assert_eq!(STRING_SOUNDS_LIKE.value_type(), ValueType::String);
        assert_eq!(STRING_NOT_SOUNDS_LIKE.operator(), ops.not_soundslike);
        assert_eq!(STRING_SOUNDS_LIKE.to_string(), "Strings sound alike");
        assert_eq!(STRING_NOT_SOUNDS_LIKE.to_string(), "Strings not sound alike");

        let fresh: Arc<dyn Evaluator> = Arc::new(StringSoundsLikeEvaluator::new());
        assert!(*fresh == **STRING_SOUNDS_LIKE);
        assert!(*fresh != **STRING_NOT_SOUNDS_LIKE);
    }

    #[test]
    fn test_definition_contract() {
        let definition = SoundslikeEvaluatorsDefinition::new();
        assert_eq!(definition.evaluator_ids(), &["soundslike"]);
        assert!(definition.is_negatable());
        assert_eq!(definition.target(), Target::Fact);
        assert!(definition.supports_type(ValueType::String));
        assert!(definition.supports_type(ValueType::Object));
        assert!(!definition.supports_type(ValueType::Integer));
        assert_eq!(definition.evaluator_cache().len(), 4);
    }
}
