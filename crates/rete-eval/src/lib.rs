//! Pluggable predicate evaluators for the rule engine
//!
//! Conditions such as `name soundslike "Smith"` are compiled by resolving the
//! operator name and the declared field type to an [`Evaluator`] once; the
//! matching network then calls that evaluator many times per cycle.
//!
//! # Example
//!
//! ```ignore
//! use rete_eval::{DefinitionRegistry, ReteContext, FactHandle, ClassFieldAccessor};
//! use rete_types::{FactObject, FactValue, ValueType};
//!
//! let registry = DefinitionRegistry::with_builtin_definitions();
//! let evaluator = registry
//!     .get_evaluator(ValueType::String, "soundslike", false, None)
//!     .unwrap();
//!
//! let ctx = ReteContext::new();
//! let accessor = ClassFieldAccessor::new("Person", "name", ValueType::String);
//! let fact = FactHandle::new(1, FactObject::new("Person").with_field("name", "Robert"));
//! assert!(evaluator.evaluate(&ctx, &accessor, &fact, &FactValue::string("Rupert")));
//! ```
//!
//! # Architecture
//!
//! - `operator`: interned `(name, negated)` operator identities
//! - `accessor`: the `FieldAccessor` contract and its field, self and global
//!   implementations
//! - `evaluator`: the `Evaluator` contract and its four evaluation shapes
//! - `cache`: per-definition `(ValueType, Operator)` lookup table, persistable
//! - `definition`: the `EvaluatorDefinition` extension point
//! - `definitions`: built-in definitions (`soundslike`)
//! - `catalog`: canonical evaluator instances, used when restoring caches
//! - `registry`: operator id to definition lookup, configurable from properties
//!
//! # Concurrency
//!
//! Operators, the catalog and every definition's operator set are populated
//! once under a lock and read-only afterwards. Evaluators are immutable and
//! shared freely between threads; only `VariableContextEntry` holds mutable
//! per-join state, and it is never shared.

pub mod accessor;
pub mod cache;
pub mod catalog;
pub mod context;
pub mod definition;
pub mod definitions;
pub mod error;
pub mod evaluator;
pub mod operator;
pub mod registry;
pub mod soundex;

// Re-export main types
pub use accessor::{AccessorKey, ClassFieldAccessor, FieldAccessor, GlobalAccessor, SelfAccessor};
pub use cache::EvaluatorCache;
pub use context::{Declaration, FactHandle, ReteContext, ReteContextBuilder, VariableContextEntry};
pub use definition::{EvaluatorDefinition, Target};
pub use definitions::SoundslikeEvaluatorsDefinition;
pub use error::{EvalError, EvalResult};
pub use evaluator::{BaseEvaluator, Comparison, Evaluator, EvaluatorId};
pub use operator::Operator;
pub use registry::DefinitionRegistry;
pub use soundex::soundex;
