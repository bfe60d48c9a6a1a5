use super::graph::KnowledgeGraph;
use super::snapshot::GraphSnapshot;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Persistent mirror of a [`KnowledgeGraph`].
///
/// `save` always replaces everything the store held before with the current
/// graph; there is no incremental synchronisation.
pub trait GraphStore {
    fn save(&self, graph: &KnowledgeGraph) -> Result<()>;

    /// Releases the store's resources. The store cannot be used afterwards.
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Store that keeps the last saved snapshot in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreState>>,
}

#[derive(Default)]
struct MemoryStoreState {
    last: Option<GraphSnapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapshot(&self) -> Option<GraphSnapshot> {
        self.inner.lock().last.clone()
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl GraphStore for MemoryStore {
    fn save(&self, graph: &KnowledgeGraph) -> Result<()> {
        let mut state = self.inner.lock();
        state.last = Some(GraphSnapshot::capture(graph));
        state.saves += 1;
        Ok(())
    }
}
