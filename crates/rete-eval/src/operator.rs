//! Interned comparison operators
//!
//! Every operator is identified by its symbolic name and a negation flag.
//! Operators are interned in a process-wide registry, so asking twice for the
//! same `(name, negated)` pair always yields the same identity. A
//! deserialized operator resolves back through the registry and must already
//! be registered there.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::EvalError;

/// An interned comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operator {
    name: &'static str,
    negated: bool,
}

/// Process-wide operator registry, seeded with the built-in comparisons
static REGISTRY: Lazy<RwLock<HashMap<(String, bool), Operator>>> = Lazy::new(|| {
    let registry = Operator::BUILTIN
        .iter()
        .map(|op| ((op.name.to_string(), op.negated), *op))
        .collect();
    RwLock::new(registry)
});

impl Operator {
    pub const EQUAL: Operator = Operator::builtin("==", false);
    pub const NOT_EQUAL: Operator = Operator::builtin("!=", false);
    pub const LESS: Operator = Operator::builtin("<", false);
    pub const LESS_OR_EQUAL: Operator = Operator::builtin("<=", false);
    pub const GREATER: Operator = Operator::builtin(">", false);
    pub const GREATER_OR_EQUAL: Operator = Operator::builtin(">=", false);

    const BUILTIN: [Operator; 6] = [
        Self::EQUAL,
        Self::NOT_EQUAL,
        Self::LESS,
        Self::LESS_OR_EQUAL,
        Self::GREATER,
        Self::GREATER_OR_EQUAL,
    ];

    const fn builtin(name: &'static str, negated: bool) -> Self {
        Self { name, negated }
    }

    /// Intern an operator, returning the canonical identity
    ///
    /// Calling this again with the same pair is a no-op that returns the
    /// already registered operator.
    pub fn add_operator_to_registry(name: &str, negated: bool) -> Operator {
        let key = (name.to_string(), negated);
        if let Some(op) = REGISTRY.read().get(&key) {
            return *op;
        }

        let mut registry = REGISTRY.write();
        // Another thread may have interned it between the two locks
        if let Some(op) = registry.get(&key) {
            return *op;
        }
        let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
        let op = Operator { name, negated };
        registry.insert(key, op);
        log::debug!("registered operator '{op}'");
        op
    }

    /// Look up a previously registered operator
    pub fn determine_operator(name: &str, negated: bool) -> Option<Operator> {
        REGISTRY.read().get(&(name.to_string(), negated)).copied()
    }

    /// Parse the textual form used by rule front ends: `name` or `not name`
    ///
    /// Only registered operators are returned.
    pub fn parse(text: &str) -> Option<Operator> {
        let text = text.trim();
        match text.strip_prefix("not ") {
            Some(rest) => Self::determine_operator(rest.trim(), true),
            None => Self::determine_operator(text, false),
        }
    }

    /// Snapshot of every registered operator, sorted
    pub fn registered() -> Vec<Operator> {
        let mut ops: Vec<Operator> = REGISTRY.read().values().copied().collect();
        ops.sort();
        ops
    }

    /// The symbolic name, without negation
    pub fn operator_string(&self) -> &'static str {
        self.name
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The operator with the same name and the opposite negation, if registered
    pub fn negation(&self) -> Option<Operator> {
        Self::determine_operator(self.name, !self.negated)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not {}", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

/// Persisted form: `{"operator": name, "negated": flag}`
#[derive(Serialize, Deserialize)]
struct OperatorRepr {
    operator: String,
    #[serde(default)]
    negated: bool,
}

impl TryFrom<OperatorRepr> for Operator {
    type Error = EvalError;

    // Never interns: unknown names in persisted data are rejected
    fn try_from(repr: OperatorRepr) -> Result<Self, Self::Error> {
        Operator::determine_operator(&repr.operator, repr.negated)
            .ok_or_else(|| EvalError::unknown_operator(repr.operator, repr.negated))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OperatorRepr {
            operator: self.name.to_string(),
            negated: self.negated,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = OperatorRepr::deserialize(deserializer)?;
        Operator::try_from(repr).map_err(serde::de::Error::custom)
    }
}
