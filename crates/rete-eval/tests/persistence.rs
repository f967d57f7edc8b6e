//! Persistence of definition caches

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rete_eval::definitions::soundslike::{self, STRING_NOT_SOUNDS_LIKE, STRING_SOUNDS_LIKE};
use rete_eval::{
    ClassFieldAccessor, EvalError, EvaluatorCache, EvaluatorDefinition, FactHandle, ReteContext,
    SoundslikeEvaluatorsDefinition,
};
use rete_types::{FactObject, FactValue, ValueType};

fn written(definition: &dyn EvaluatorDefinition) -> Vec<u8> {
    let mut buffer = Vec::new();
    definition.write_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_definition_round_trip_behaves_identically() {
    let original = SoundslikeEvaluatorsDefinition::new();
    let buffer = written(&original);

    let mut restored = SoundslikeEvaluatorsDefinition::new();
    restored.read_from(&mut buffer.as_slice()).unwrap();

    assert_eq!(restored.evaluator_cache().len(), original.evaluator_cache().len());
    assert_eq!(
        restored.evaluator_cache().supported_types(),
        vec![ValueType::String, ValueType::Object]
    );

    let ops = soundslike::register();
    for value_type in [ValueType::String, ValueType::Object] {
        let positive = restored.get_evaluator(value_type, ops.soundslike).unwrap();
        let negative = restored.get_evaluator(value_type, ops.not_soundslike).unwrap();
        assert!(Arc::ptr_eq(&positive, &STRING_SOUNDS_LIKE));
        assert!(Arc::ptr_eq(&negative, &STRING_NOT_SOUNDS_LIKE));
    }

    let ctx = ReteContext::new();
    let accessor = ClassFieldAccessor::new("Person", "name", ValueType::String);
    let fact = FactHandle::new(1, FactObject::new("Person").with_field("name", "Robert"));
    let rupert = FactValue::string("Rupert");
    for definition in [&original, &restored] {
        let evaluator = definition
            .get_evaluator_for(ValueType::String, "soundslike", false, None)
            .unwrap();
        assert!(evaluator.evaluate(&ctx, &accessor, &fact, &rupert));
    }
}

#[test]
fn test_written_form_is_stable() {
    let first = written(&SoundslikeEvaluatorsDefinition::new());
    let second = written(&SoundslikeEvaluatorsDefinition::new());
    assert_eq!(first, second);
}

#[test]
fn test_read_rejects_unknown_evaluator() {
    let json = r#"{"entries":[{"value_type":"String","operator":{"operator":"soundslike","negated":false},"evaluator":"string-metaphone"}]}"#;
    let mut definition = SoundslikeEvaluatorsDefinition::new();
    let err = definition.read_from(&mut json.as_bytes()).unwrap_err();
    assert!(matches!(err, EvalError::Serialization(_)));
    assert!(err.to_string().contains("string-metaphone"));
}

#[test]
fn test_read_rejects_malformed_input() {
    let mut definition = SoundslikeEvaluatorsDefinition::new();
    assert!(definition.read_from(&mut "not json".as_bytes()).is_err());
    // A failed read leaves the cache untouched
    assert_eq!(definition.evaluator_cache().len(), 4);
}

#[test]
fn test_definitions_share_one_stream() {
    let first = SoundslikeEvaluatorsDefinition::new();
    let second = SoundslikeEvaluatorsDefinition::new();
    let mut buffer = Vec::new();
    first.write_to(&mut buffer).unwrap();
    second.write_to(&mut buffer).unwrap();
    EvaluatorCache::new().write_to(&mut buffer).unwrap();

    let mut stream = buffer.as_slice();
    let mut restored_first = SoundslikeEvaluatorsDefinition::new();
    let mut restored_second = SoundslikeEvaluatorsDefinition::new();
    restored_first.read_from(&mut stream).unwrap();
    restored_second.read_from(&mut stream).unwrap();
    let trailing = EvaluatorCache::read_from(&mut stream).unwrap();

    assert_eq!(restored_first.evaluator_cache().len(), 4);
    assert_eq!(restored_second.evaluator_cache().len(), 4);
    assert!(trailing.is_empty());
    assert!(stream.is_empty());
    assert!(EvaluatorCache::read_from(&mut stream).is_err());
}

#[test]
fn test_read_rejects_rebound_evaluator() {
    soundslike::register();
    let json = r#"{"entries":[{"value_type":"Integer","operator":{"operator":"soundslike","negated":true},"evaluator":"string-not-soundslike"}]}"#;
    let mut definition = SoundslikeEvaluatorsDefinition::new();
    assert!(definition.read_from(&mut json.as_bytes()).is_err());
    assert!(!definition.supports_type(ValueType::Integer));
}

#[test]
fn test_empty_cache_round_trip() {
    let cache = EvaluatorCache::new();
    let restored = EvaluatorCache::from_json(&cache.to_json().unwrap()).unwrap();
    assert!(restored.is_empty());
}
