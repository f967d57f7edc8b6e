//! soundslike evaluator tests
//!
//! Covers the four evaluation shapes, the null policy, negation and symmetry.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rete_eval::definitions::soundslike;
use rete_eval::{
    ClassFieldAccessor, Declaration, Evaluator, EvaluatorDefinition, FactHandle, FieldAccessor,
    GlobalAccessor, ReteContext, SelfAccessor, SoundslikeEvaluatorsDefinition, VariableContextEntry,
};
use rete_types::{FactObject, FactValue, ValueType};
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

fn definition() -> SoundslikeEvaluatorsDefinition {
    SoundslikeEvaluatorsDefinition::new()
}

fn sounds_like() -> Arc<dyn Evaluator> {
    definition()
        .get_evaluator_for(ValueType::String, "soundslike", false, None)
        .unwrap()
}

fn not_sounds_like() -> Arc<dyn Evaluator> {
    definition()
        .get_evaluator_for(ValueType::String, "soundslike", true, None)
        .unwrap()
}

fn person(id: u64, name: impl Into<FactValue>) -> FactHandle {
    FactHandle::new(id, FactObject::new("Person").with_field("name", name.into()))
}

fn name_accessor() -> Arc<dyn FieldAccessor> {
    Arc::new(ClassFieldAccessor::new("Person", "name", ValueType::String))
}

fn string_value(s: Option<&str>) -> FactValue {
    s.map(FactValue::string).unwrap_or_default()
}

/// Evaluate `v1 <op> v2` through every evaluation shape
fn all_shapes(evaluator: &dyn Evaluator, v1: &FactValue, v2: &FactValue) -> [bool; 4] {
    let ctx = ReteContext::new();
    let accessor = name_accessor();
    let right = person(1, v1.clone());
    let left = person(2, v2.clone());

    let literal = evaluator.evaluate(&ctx, accessor.as_ref(), &right, v2);

    let mut entry = VariableContextEntry::new(accessor.clone(), Declaration::new("$name", accessor.clone()));
    entry.update_from_fact_handle(&ctx, &right);
    let cached_right = evaluator.evaluate_cached_right(&ctx, &entry, &left);

    entry.update_from_tuple(&ctx, &left);
    let cached_left = evaluator.evaluate_cached_left(&ctx, &entry, &right);

    let facts = evaluator.evaluate_facts(&ctx, accessor.as_ref(), &right, accessor.as_ref(), &left);

    [literal, cached_right, cached_left, facts]
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_operators_registered_for_string_and_object() {
    let ops = soundslike::register();
    let definition = definition();

    assert_ne!(ops.soundslike, ops.not_soundslike);
    for value_type in [ValueType::String, ValueType::Object] {
        assert!(definition.get_evaluator(value_type, ops.soundslike).is_some());
        assert!(definition.get_evaluator(value_type, ops.not_soundslike).is_some());
    }
}

#[test]
fn test_type_coverage() {
    let definition = definition();
    for value_type in ValueType::ALL {
        let expected = matches!(value_type, ValueType::String | ValueType::Object);
        assert_eq!(definition.supports_type(value_type), expected, "{value_type}");
    }
}

#[test]
fn test_lookup_is_repeatable() {
    let first = sounds_like();
    let second = sounds_like();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_lookup_by_name_and_targets() {
    let definition = definition();
    let evaluator = definition
        .get_evaluator_by_name(
            ValueType::Object,
            "soundslike",
            false,
            Some("ignored"),
            rete_eval::Target::Handle,
            rete_eval::Target::Fact,
        )
        .unwrap();
    assert_eq!(evaluator.operator(), soundslike::register().soundslike);
    assert!(definition
        .get_evaluator_for(ValueType::String, "soundsalike", false, None)
        .is_none());
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn test_robert_sounds_like_rupert() {
    let robert = FactValue::string("Robert");
    let rupert = FactValue::string("Rupert");

    assert_eq!(all_shapes(sounds_like().as_ref(), &robert, &rupert), [true; 4]);
    assert_eq!(all_shapes(not_sounds_like().as_ref(), &robert, &rupert), [false; 4]);
}

#[test]
fn test_null_is_neither_soundslike_nor_not_soundslike() {
    let robert = FactValue::string("Robert");

    for (v1, v2) in [
        (&robert, &FactValue::Null),
        (&FactValue::Null, &robert),
        (&FactValue::Null, &FactValue::Null),
    ] {
        assert_eq!(all_shapes(sounds_like().as_ref(), v1, v2), [false; 4]);
        assert_eq!(all_shapes(not_sounds_like().as_ref(), v1, v2), [false; 4]);
    }
}

#[test]
fn test_two_fact_form() {
    let ctx = ReteContext::new();
    let a = person(1, "Smith");
    let b = person(2, "Smyth");
    let accessor_a = ClassFieldAccessor::new("Person", "name", ValueType::String);
    let accessor_b = ClassFieldAccessor::new("Person", "name", ValueType::String);

    assert!(sounds_like().evaluate_facts(&ctx, &accessor_a, &a, &accessor_b, &b));
    assert!(!not_sounds_like().evaluate_facts(&ctx, &accessor_a, &a, &accessor_b, &b));
}

#[test]
fn test_cached_forms_match_direct_form() {
    let ctx = ReteContext::new();
    let evaluator = sounds_like();
    let accessor = name_accessor();
    let katherine = person(1, "Katherine");
    let catherine = person(2, "Catherine");

    let direct = evaluator.evaluate(
        &ctx,
        accessor.as_ref(),
        &katherine,
        &FactValue::string("Catherine"),
    );

    let mut entry = VariableContextEntry::new(accessor.clone(), Declaration::new("$name", accessor.clone()));
    entry.update_from_tuple(&ctx, &catherine);
    assert_eq!(entry.left, FactValue::string("Catherine"));
    assert_eq!(evaluator.evaluate_cached_left(&ctx, &entry, &katherine), direct);

    entry.reset();
    entry.right = FactValue::string("Catherine");
    assert_eq!(evaluator.evaluate_cached_right(&ctx, &entry, &katherine), direct);

    // C365 vs K365
    assert!(!direct);
}

#[rstest]
#[case("Ashcraft", "Ashcroft", true)]
#[case("Tymczak", "Tymczack", true)]
#[case("Pfister", "Pfeister", true)]
#[case("Lee", "Lea", true)]
#[case("Smith", "Jones", false)]
#[case("Robert", "Rubin", false)]
#[case("42", "42", false)]
fn test_pairs(#[case] v1: &str, #[case] v2: &str, #[case] expected: bool) {
    let (v1, v2) = (FactValue::string(v1), FactValue::string(v2));
    assert_eq!(all_shapes(sounds_like().as_ref(), &v1, &v2), [expected; 4]);
    assert_eq!(all_shapes(not_sounds_like().as_ref(), &v1, &v2), [!expected; 4]);
}

#[test]
fn test_non_string_operand_is_treated_as_null() {
    let evaluator = definition()
        .get_evaluator_for(ValueType::Object, "soundslike", true, None)
        .unwrap();
    let v1 = FactValue::Integer(42);
    let v2 = FactValue::string("Robert");
    assert_eq!(all_shapes(evaluator.as_ref(), &v1, &v2), [false; 4]);
}

#[test]
fn test_self_and_global_accessors() {
    let ctx = ReteContext::builder().global("target", "Rupert").build();
    let evaluator = sounds_like();
    let fact = FactHandle::new(7, "Robert");
    let self_accessor = SelfAccessor::new("String", ValueType::String);
    let global = GlobalAccessor::new("target", ValueType::String);

    assert!(evaluator.evaluate_facts(&ctx, &self_accessor, &fact, &global, &fact));
    assert!(evaluator.evaluate(&ctx, &global, &fact, &FactValue::string("Robert")));
}

// ============================================================================
// Laws
// ============================================================================

fn name_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        8 => "[A-Za-z][a-z]{0,9}".prop_map(Some),
        1 => "[0-9 '-]{0,4}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn prop_shapes_agree(v1 in name_strategy(), v2 in name_strategy()) {
        let (v1, v2) = (string_value(v1.as_deref()), string_value(v2.as_deref()));
        for evaluator in [sounds_like(), not_sounds_like()] {
            let results = all_shapes(evaluator.as_ref(), &v1, &v2);
            prop_assert!(results.iter().all(|r| *r == results[0]), "{results:?}");
        }
    }

    #[test]
    fn prop_negation_law(v1 in name_strategy(), v2 in name_strategy()) {
        let ctx = ReteContext::new();
        let accessor = name_accessor();
        let fact = person(1, string_value(v1.as_deref()));
        let literal = string_value(v2.as_deref());

        let positive = sounds_like().evaluate(&ctx, accessor.as_ref(), &fact, &literal);
        let negative = not_sounds_like().evaluate(&ctx, accessor.as_ref(), &fact, &literal);

        if v1.is_some() && v2.is_some() {
            prop_assert_eq!(negative, !positive);
        } else {
            prop_assert!(!positive && !negative);
        }
    }

    #[test]
    fn prop_symmetry(v1 in "[A-Za-z]{1,10}", v2 in "[A-Za-z]{1,10}") {
        let (v1, v2) = (FactValue::string(v1), FactValue::string(v2));
        for evaluator in [sounds_like(), not_sounds_like()] {
            prop_assert_eq!(
                all_shapes(evaluator.as_ref(), &v1, &v2),
                all_shapes(evaluator.as_ref(), &v2, &v1)
            );
        }
    }
}
