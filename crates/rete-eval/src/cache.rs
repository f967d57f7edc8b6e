//! Evaluator cache: `(ValueType, Operator)` to evaluator
//!
//! Each definition owns one cache, filled while the definition is built and
//! read-only afterwards. The cache persists as an opaque JSON document that
//! names evaluators by id; restoring it resolves every id back to the
//! canonical instance in the catalog.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{Read, Write};
use std::sync::Arc;

use rete_types::ValueType;

use crate::catalog;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::{Evaluator, EvaluatorId};
use crate::operator::Operator;

/// Lookup table from value type and operator to evaluator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "CacheSnapshot", into = "CacheSnapshot")]
pub struct EvaluatorCache {
    evaluators: HashMap<(ValueType, Operator), Arc<dyn Evaluator>>,
}

impl EvaluatorCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an evaluator to a value type and operator
    ///
    /// Adding the same evaluator again is a no-op; binding a different one to
    /// an occupied pair is a configuration error.
    pub fn add_evaluator(
        &mut self,
        value_type: ValueType,
        operator: Operator,
        evaluator: Arc<dyn Evaluator>,
    ) -> EvalResult<()> {
        match self.evaluators.entry((value_type, operator)) {
            Entry::Occupied(existing) => {
                if **existing.get() == *evaluator {
                    Ok(())
                } else {
                    Err(EvalError::ConflictingEvaluator {
                        value_type,
                        operator: operator.to_string(),
                        existing: existing.get().id().to_string(),
                        rejected: evaluator.id().to_string(),
                    })
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(evaluator);
                Ok(())
            }
        }
    }

    /// Get the evaluator for a value type and operator, if any
    pub fn get_evaluator(&self, value_type: ValueType, operator: Operator) -> Option<Arc<dyn Evaluator>> {
        self.evaluators.get(&(value_type, operator)).cloned()
    }

    /// Check whether at least one operator resolves for this type
    pub fn supports_type(&self, value_type: ValueType) -> bool {
        self.evaluators.keys().any(|(t, _)| *t == value_type)
    }

    /// Value types with at least one evaluator, sorted
    pub fn supported_types(&self) -> Vec<ValueType> {
        let mut types: Vec<ValueType> = self.evaluators.keys().map(|(t, _)| *t).collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Iterate over all bindings, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (ValueType, Operator, &Arc<dyn Evaluator>)> {
        self.evaluators.iter().map(|((t, op), e)| (*t, *op, e))
    }

    /// Build a cache from a table of bindings
    ///
    /// Every binding goes through [`EvaluatorCache::add_evaluator`], so a
    /// table binding two different evaluators to one pair is rejected.
    pub fn from_bindings<I>(bindings: I) -> EvalResult<Self>
    where
        I: IntoIterator<Item = (ValueType, Operator, Arc<dyn Evaluator>)>,
    {
        let mut cache = Self::new();
        for (value_type, operator, evaluator) in bindings {
            cache.add_evaluator(value_type, operator, evaluator)?;
        }
        Ok(cache)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> EvalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from JSON produced by [`EvaluatorCache::to_json`]
    pub fn from_json(json: &str) -> EvalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the persisted form to a stream
    pub fn write_to(&self, writer: &mut dyn Write) -> EvalResult<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read one persisted cache from a stream
    ///
    /// Reading stops after the cache document; whatever follows it in the
    /// stream is left for the next reader.
    pub fn read_from(reader: &mut dyn Read) -> EvalResult<Self> {
        let mut documents = serde_json::Deserializer::from_reader(reader).into_iter::<Self>();
        match documents.next() {
            Some(cache) => Ok(cache?),
            None => Err(serde_json::Error::custom("missing evaluator cache").into()),
        }
    }
}

/// Persisted form of a cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheSnapshot {
    entries: Vec<CacheEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheEntry {
    value_type: ValueType,
    operator: Operator,
    evaluator: EvaluatorId,
}

impl From<EvaluatorCache> for CacheSnapshot {
    fn from(cache: EvaluatorCache) -> Self {
        let mut entries: Vec<CacheEntry> = cache
            .iter()
            .map(|(value_type, operator, evaluator)| CacheEntry {
                value_type,
                operator,
                evaluator: evaluator.id(),
            })
            .collect();
        entries.sort_by(|a, b| (a.value_type, a.operator).cmp(&(b.value_type, b.operator)));
        Self { entries }
    }
}

impl TryFrom<CacheSnapshot> for EvaluatorCache {
    type Error = EvalError;

    fn try_from(snapshot: CacheSnapshot) -> Result<Self, Self::Error> {
        let mut cache = EvaluatorCache::new();
        for entry in snapshot.entries {
            let evaluator = catalog::resolve(&entry.evaluator)
                .ok_or_else(|| EvalError::unknown_evaluator(entry.evaluator.as_str()))?;
            check_binding(evaluator.as_ref(), entry.value_type, entry.operator)?;
            if cache.get_evaluator(entry.value_type, entry.operator).is_some() {
                return Err(EvalError::DuplicateEntry {
                    value_type: entry.value_type,
                    operator: entry.operator.to_string(),
                });
            }
            cache.add_evaluator(entry.value_type, entry.operator, evaluator)?;
        }
        log::debug!("restored evaluator cache with {} entries", cache.len());
        Ok(cache)
    }
}

/// An evaluator serves its own operator, for its own type or for untyped
/// objects
fn check_binding(evaluator: &dyn Evaluator, value_type: ValueType, operator: Operator) -> EvalResult<()> {
    let type_ok = value_type == evaluator.value_type() || value_type == ValueType::Object;
    if type_ok && operator == evaluator.operator() {
        return Ok(());
    }
    Err(EvalError::MismatchedBinding {
        evaluator: evaluator.id().to_string(),
        bound_type: evaluator.value_type(),
        bound_operator: evaluator.operator().to_string(),
        value_type,
        operator: operator.to_string(),
    })
}
