//! Typed, pluggable condition evaluators for a Rete rule engine
//!
//! This crate bundles:
//! - Fact values and their declared value types
//! - Interned operators, including negated forms
//! - Field accessors over facts, the fact itself and session globals
//! - Evaluator definitions, their persistable caches and the built-in
//!   `soundslike` family
//!
//! # Example
//!
//! ```ignore
//! use rete::{DefinitionRegistry, FactHandle, FactObject, FactValue, ReteContext, ValueType};
//! use rete::eval::ClassFieldAccessor;
//!
//! let registry = DefinitionRegistry::with_builtin_definitions();
//! let not_soundslike = registry
//!     .get_evaluator(ValueType::String, "soundslike", true, None)
//!     .unwrap();
//!
//! let accessor = ClassFieldAccessor::new("Person", "name", ValueType::String);
//! let fact = FactHandle::new(1, FactObject::new("Person").with_field("name", "Robert"));
//! assert!(!not_soundslike.evaluate(&ReteContext::new(), &accessor, &fact, &FactValue::string("Rupert")));
//! ```

// Re-export all public APIs from internal crates
pub use rete_eval as eval;
pub use rete_types as types;

// Convenience re-exports
pub use rete_eval::{
    DefinitionRegistry, EvalError, EvalResult, Evaluator, EvaluatorDefinition, FactHandle,
    FieldAccessor, Operator, ReteContext,
};
pub use rete_types::{FactObject, FactValue, ValueType};
