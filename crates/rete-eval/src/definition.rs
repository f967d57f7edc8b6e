//! Evaluator definitions: the unit of extension
//!
//! A definition contributes one or more operator names, registers their
//! operators, and owns the cache that maps each supported
//! `(ValueType, Operator)` pair to an evaluator. The rule compiler only talks
//! to definitions through this trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use rete_types::ValueType;

use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::operator::Operator;

/// What an operand of a comparison refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Target {
    /// The value extracted from the fact
    #[default]
    Fact,
    /// The fact handle itself
    Handle,
    /// Either
    Both,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fact => write!(f, "fact"),
            Self::Handle => write!(f, "handle"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// A pluggable family of evaluators
pub trait EvaluatorDefinition: Send + Sync + fmt::Debug {
    /// Name used in configuration and diagnostics
    fn name(&self) -> &str;

    /// Operator names contributed by this definition, without negation
    fn evaluator_ids(&self) -> &[&'static str];

    /// Whether a negated form of every operator exists
    fn is_negatable(&self) -> bool;

    /// Natural comparison target of the operators
    fn target(&self) -> Target;

    fn supports_type(&self, value_type: ValueType) -> bool;

    /// Look up by canonical operator
    fn get_evaluator(&self, value_type: ValueType, operator: Operator) -> Option<Arc<dyn Evaluator>>;

    /// Look up by canonical operator with operator parameters
    ///
    /// Definitions whose evaluators take no parameters ignore the text.
    fn get_evaluator_with_parameters(
        &self,
        value_type: ValueType,
        operator: Operator,
        _parameter_text: Option<&str>,
    ) -> Option<Arc<dyn Evaluator>> {
        self.get_evaluator(value_type, operator)
    }

    /// Look up by symbolic name
    ///
    /// The name is resolved through the operator registry, so only operators
    /// that were registered can match.
    fn get_evaluator_by_name(
        &self,
        value_type: ValueType,
        operator_id: &str,
        negated: bool,
        parameter_text: Option<&str>,
        _left: Target,
        _right: Target,
    ) -> Option<Arc<dyn Evaluator>> {
        let operator = Operator::determine_operator(operator_id, negated)?;
        self.get_evaluator_with_parameters(value_type, operator, parameter_text)
    }

    /// Look up by symbolic name with both targets set to [`Target::Fact`]
    fn get_evaluator_for(
        &self,
        value_type: ValueType,
        operator_id: &str,
        negated: bool,
        parameter_text: Option<&str>,
    ) -> Option<Arc<dyn Evaluator>> {
        self.get_evaluator_by_name(
            value_type,
            operator_id,
            negated,
            parameter_text,
            Target::Fact,
            Target::Fact,
        )
    }

    /// Persist the evaluator cache
    fn write_to(&self, writer: &mut dyn Write) -> EvalResult<()>;

    /// Replace the evaluator cache with a persisted one
    ///
    /// Consumes only what [`EvaluatorDefinition::write_to`] wrote, so several
    /// definitions can be read back from one stream in order.
    fn read_from(&mut self, reader: &mut dyn Read) -> EvalResult<()>;
}
