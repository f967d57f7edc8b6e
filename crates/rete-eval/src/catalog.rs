//! Process-wide catalog of canonical evaluator instances
//!
//! Restoring a persisted cache only has evaluator ids to work with; the
//! catalog maps each id back to the one shared instance so a restored cache
//! never allocates duplicates. Built-in evaluators are always present;
//! extension definitions add theirs when they register.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::definitions;
use crate::evaluator::{Evaluator, EvaluatorId};

static CATALOG: Lazy<RwLock<HashMap<EvaluatorId, Arc<dyn Evaluator>>>> = Lazy::new(|| {
    let catalog = definitions::builtin_evaluators()
        .into_iter()
        .map(|evaluator| (evaluator.id(), evaluator))
        .collect();
    RwLock::new(catalog)
});

/// Register an evaluator, returning the canonical instance for its id
///
/// If an evaluator with the same id is already known, that one is returned
/// and the argument is dropped.
pub fn register_evaluator(evaluator: Arc<dyn Evaluator>) -> Arc<dyn Evaluator> {
    let id = evaluator.id();
    let mut catalog = CATALOG.write();
    if let Some(existing) = catalog.get(&id) {
        return existing.clone();
    }
    log::debug!("cataloged evaluator '{id}' ({evaluator})");
    catalog.insert(id, evaluator.clone());
    evaluator
}

/// Resolve an id to its canonical evaluator
pub fn resolve(id: &EvaluatorId) -> Option<Arc<dyn Evaluator>> {
    CATALOG.read().get(id).cloned()
}

/// Ids of every cataloged evaluator, sorted
pub fn evaluator_ids() -> Vec<EvaluatorId> {
    let mut ids: Vec<EvaluatorId> = CATALOG.read().keys().cloned().collect();
    ids.sort();
    ids
}
