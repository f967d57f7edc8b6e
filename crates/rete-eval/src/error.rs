//! Errors raised while resolving and configuring evaluators
//!
//! Evaluation itself never fails; everything here is reported at rule
//! compilation or registration time.

use rete_types::ValueType;
use thiserror::Error;

/// Result type for evaluator operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while building, resolving or restoring evaluators
#[derive(Debug, Error)]
pub enum EvalError {
    /// A value of the wrong domain was read through a typed accessor getter
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// No operator with this name/negation has been registered
    #[error("Unknown operator: {name} (negated: {negated})")]
    UnknownOperator { name: String, negated: bool },

    /// A persisted cache referenced an evaluator nobody registered
    #[error("Unknown evaluator: {id}")]
    UnknownEvaluator { id: String },

    /// A different evaluator is already bound to this (type, operator) pair
    #[error("Conflicting evaluator for {value_type} {operator}: {existing} is already registered, got {rejected}")]
    ConflictingEvaluator {
        value_type: ValueType,
        operator: String,
        existing: String,
        rejected: String,
    },

    /// A persisted cache listed the same (type, operator) pair twice
    #[error("Duplicate entry for {value_type} {operator}")]
    DuplicateEntry { value_type: ValueType, operator: String },

    /// A persisted entry bound an evaluator to a pair it does not serve
    #[error("Evaluator {evaluator} ({bound_type} {bound_operator}) cannot serve {value_type} {operator}")]
    MismatchedBinding {
        evaluator: String,
        bound_type: ValueType,
        bound_operator: String,
        value_type: ValueType,
        operator: String,
    },

    /// An operator id is already owned by another definition
    #[error("Operator '{id}' is already provided by {existing}")]
    ConflictingDefinition { id: String, existing: String },

    /// A configuration entry could not be applied
    #[error("Invalid configuration entry '{key}': {message}")]
    InvalidConfiguration { key: String, message: String },

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvalError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(name: impl Into<String>, negated: bool) -> Self {
        Self::UnknownOperator {
            name: name.into(),
            negated,
        }
    }

    /// Create an unknown evaluator error
    pub fn unknown_evaluator(id: impl Into<String>) -> Self {
        Self::UnknownEvaluator { id: id.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }
}
