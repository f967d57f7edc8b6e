//! The evaluator contract
//!
//! An evaluator is a stateless comparison bound to one `(ValueType, Operator)`
//! pair. The matching network calls it in one of four shapes depending on
//! where the operands come from; all shapes must agree on the result for the
//! same pair of logical values.
//!
//! Operand order is fixed across shapes: the first operand is always the
//! value read from the fact of the pattern being matched, the second is the
//! literal, the declaration value, or the other fact's value.

use serde::{Deserialize, Serialize};
use std::fmt;

use rete_types::{FactValue, ValueType};

use crate::accessor::FieldAccessor;
use crate::context::{FactHandle, ReteContext, VariableContextEntry};
use crate::operator::Operator;

/// Stable identity of an evaluator implementation
///
/// Persisted caches refer to evaluators by this id and resolve it back to the
/// canonical instance through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluatorId(String);

impl EvaluatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvaluatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison logic bound to one value type and operator
pub trait Evaluator: Send + Sync + fmt::Debug + fmt::Display {
    fn id(&self) -> EvaluatorId;

    fn value_type(&self) -> ValueType;

    fn operator(&self) -> Operator;

    /// Compare a fact's field against a literal
    fn evaluate(
        &self,
        ctx: &ReteContext,
        accessor: &dyn FieldAccessor,
        handle: &FactHandle,
        literal: &FactValue,
    ) -> bool;

    /// Compare the cached right operand against a freshly read left fact
    fn evaluate_cached_right(
        &self,
        ctx: &ReteContext,
        context: &VariableContextEntry,
        left: &FactHandle,
    ) -> bool;

    /// Compare a freshly read right fact against the cached left operand
    fn evaluate_cached_left(
        &self,
        ctx: &ReteContext,
        context: &VariableContextEntry,
        right: &FactHandle,
    ) -> bool;

    /// Compare values read from two different facts
    fn evaluate_facts(
        &self,
        ctx: &ReteContext,
        accessor1: &dyn FieldAccessor,
        handle1: &FactHandle,
        accessor2: &dyn FieldAccessor,
        handle2: &FactHandle,
    ) -> bool;
}

/// Evaluators are equal when they are the same implementation bound to the
/// same type and operator.
impl PartialEq for dyn Evaluator {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
            && self.value_type() == other.value_type()
            && self.operator() == other.operator()
    }
}

impl Eq for dyn Evaluator {}

/// The binding every evaluator carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseEvaluator {
    value_type: ValueType,
    operator: Operator,
}

impl BaseEvaluator {
    pub fn new(value_type: ValueType, operator: Operator) -> Self {
        Self {
            value_type,
            operator,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}

/// Evaluators that reduce to a pure comparison of two extracted values
///
/// Implementing this trait provides all four evaluation shapes, so they
/// cannot disagree.
pub trait Comparison: Send + Sync + fmt::Debug + fmt::Display {
    fn evaluator_id(&self) -> EvaluatorId;

    fn base(&self) -> &BaseEvaluator;

    /// Compare the pattern-side value against the other operand
    fn compare(&self, value: &FactValue, other: &FactValue) -> bool;
}

impl<T: Comparison> Evaluator for T {
    fn id(&self) -> EvaluatorId {
        self.evaluator_id()
    }

    fn value_type(&self) -> ValueType {
        self.base().value_type()
    }

    fn operator(&self) -> Operator {
        self.base().operator()
    }

    fn evaluate(
        &self,
        ctx: &ReteContext,
        accessor: &dyn FieldAccessor,
        handle: &FactHandle,
        literal: &FactValue,
    ) -> bool {
        self.compare(accessor.get_value(ctx, handle.object()), literal)
    }

    fn evaluate_cached_right(
        &self,
        ctx: &ReteContext,
        context: &VariableContextEntry,
        left: &FactHandle,
    ) -> bool {
        let declared = context.declaration.extractor().get_value(ctx, left.object());
        self.compare(&context.right, declared)
    }

    fn evaluate_cached_left(
        &self,
        ctx: &ReteContext,
        context: &VariableContextEntry,
        right: &FactHandle,
    ) -> bool {
        let value = context.extractor.get_value(ctx, right.object());
        self.compare(value, &context.left)
    }

    fn evaluate_facts(
        &self,
        ctx: &ReteContext,
        accessor1: &dyn FieldAccessor,
        handle1: &FactHandle,
        accessor2: &dyn FieldAccessor,
        handle2: &FactHandle,
    ) -> bool {
        let value1 = accessor1.get_value(ctx, handle1.object());
        let value2 = accessor2.get_value(ctx, handle2.object());
        self.compare(value1, value2)
    }
}
