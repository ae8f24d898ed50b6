//! Per-call bookkeeping keyed by node identity.

use crate::shared::NodeId;
use rustc_hash::{FxHashMap, FxHashSet};

/// Maps an input node to the output already produced for it.
pub(crate) struct Registry<V> {
    produced: FxHashMap<NodeId, V>,
}

impl<V> Registry<V> {
    pub(crate) fn new() -> Self {
        Registry {
            produced: FxHashMap::default(),
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&V> {
        self.produced.get(&id)
    }

    /// Must be called before any child of `id` is visited.
    pub(crate) fn register(&mut self, id: NodeId, output: V) {
        self.produced.insert(id, output);
    }
}

/// Set of nodes already entered by a traversal.
#[derive(Default)]
pub(crate) struct VisitedSet {
    entered: FxHashSet<NodeId>,
}

impl VisitedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as entered. Returns `false` if it already was.
    pub(crate) fn enter(&mut self, id: NodeId) -> bool {
        self.entered.insert(id)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.entered.contains(&id)
    }

    pub(crate) fn leave(&mut self, id: NodeId) {
        self.entered.remove(&id);
    }
}
