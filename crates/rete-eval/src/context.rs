//! Evaluation context handed to every evaluator call
//!
//! `ReteContext` is the session-level state visible to accessors (globals).
//! `FactHandle` wraps a fact held in working memory, and
//! `VariableContextEntry` is the per-join cache used by the incremental
//! evaluation shapes.

use std::collections::HashMap;
use std::sync::Arc;

use rete_types::FactValue;

use crate::accessor::FieldAccessor;

/// Session state visible while evaluating conditions
#[derive(Debug, Clone, Default)]
pub struct ReteContext {
    /// Session global values, by name
    globals: HashMap<String, FactValue>,
}

impl ReteContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a context
    pub fn builder() -> ReteContextBuilder {
        ReteContextBuilder::default()
    }

    /// Set a global value
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<FactValue>) {
        self.globals.insert(name.into(), value.into());
    }

    /// Get a global value
    pub fn get_global(&self, name: &str) -> Option<&FactValue> {
        self.globals.get(name)
    }
}

/// Builder for [`ReteContext`]
#[derive(Debug, Default)]
pub struct ReteContextBuilder {
    globals: HashMap<String, FactValue>,
}

impl ReteContextBuilder {
    /// Add a global value
    pub fn global(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> ReteContext {
        ReteContext {
            globals: self.globals,
        }
    }
}

/// Handle to a fact inserted into working memory
#[derive(Debug, Clone, PartialEq)]
pub struct FactHandle {
    id: u64,
    object: FactValue,
}

impl FactHandle {
    pub fn new(id: u64, object: impl Into<FactValue>) -> Self {
        Self {
            id,
            object: object.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The fact itself
    pub fn object(&self) -> &FactValue {
        &self.object
    }
}

/// A pattern variable bound on the left side of a join
#[derive(Debug, Clone)]
pub struct Declaration {
    identifier: String,
    accessor: Arc<dyn FieldAccessor>,
}

impl Declaration {
    pub fn new(identifier: impl Into<String>, accessor: Arc<dyn FieldAccessor>) -> Self {
        Self {
            identifier: identifier.into(),
            accessor,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Accessor used to read the bound value out of a left-side fact
    pub fn extractor(&self) -> &dyn FieldAccessor {
        self.accessor.as_ref()
    }
}

/// Cached operand state for one join evaluation
///
/// A join node owns one entry per partial match being evaluated. Either side
/// is extracted once and cached here while the other side varies:
/// `update_from_tuple` caches the left operand, `update_from_fact_handle`
/// caches the right one. Entries are never shared between threads.
#[derive(Debug, Clone)]
pub struct VariableContextEntry {
    /// Reads the right-hand operand from facts of the current pattern
    pub extractor: Arc<dyn FieldAccessor>,
    /// Reads the left-hand operand from the bound fact
    pub declaration: Declaration,
    /// Cached left operand
    pub left: FactValue,
    /// Cached right operand
    pub right: FactValue,
}

impl VariableContextEntry {
    pub fn new(extractor: Arc<dyn FieldAccessor>, declaration: Declaration) -> Self {
        Self {
            extractor,
            declaration,
            left: FactValue::Null,
            right: FactValue::Null,
        }
    }

    /// Cache the left operand, read through the declaration
    pub fn update_from_tuple(&mut self, ctx: &ReteContext, left: &FactHandle) {
        self.left = self
            .declaration
            .extractor()
            .get_value(ctx, left.object())
            .clone();
    }

    /// Cache the right operand, read through the pattern extractor
    pub fn update_from_fact_handle(&mut self, ctx: &ReteContext, right: &FactHandle) {
        self.right = self.extractor.get_value(ctx, right.object()).clone();
    }

    /// Forget both cached operands
    pub fn reset(&mut self) {
        self.left = FactValue::Null;
        self.right = FactValue::Null;
    }
}
