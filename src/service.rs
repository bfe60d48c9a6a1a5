use crate::error::Result;
use crate::ingestion::{BuildReport, ExtractionBatch};
use crate::memory::{GraphExport, GraphStore, KnowledgeGraph};
use crate::reasoning::{EntityDetails, GraphQueryEngine, RelatedEntity};
use tracing::info;

/// Owns one knowledge graph and the store it is mirrored to.
///
/// Built with [`KnowledgeBase::open`] and torn down with [`KnowledgeBase::close`];
/// nothing here lives in process-wide state.
pub struct KnowledgeBase<S: GraphStore> {
    graph: KnowledgeGraph,
    store: S,
}

impl<S: GraphStore> KnowledgeBase<S> {
    /// Starts from an empty graph.
    pub fn open(store: S) -> Self {
        Self::with_graph(KnowledgeGraph::new(), store)
    }

    /// Starts from a graph restored elsewhere, e.g. a JSON snapshot.
    pub fn with_graph(graph: KnowledgeGraph, store: S) -> Self {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "knowledge base opened"
        );
        Self { graph, store }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ingest(&mut self, batch: &ExtractionBatch) -> Result<BuildReport> {
        self.graph.build(&batch.entities, &batch.relationships)
    }

    pub fn query_engine(&self) -> GraphQueryEngine<'_> {
        GraphQueryEngine::new(&self.graph)
    }

    pub fn find_related(&self, entity_name: &str, max_depth: usize) -> Vec<RelatedEntity> {
        self.query_engine().find_related(entity_name, max_depth)
    }

    pub fn get_entity_details(&self, entity_name: &str) -> Option<EntityDetails> {
        self.query_engine().get_entity_details(entity_name)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<RelatedEntity> {
        self.query_engine().search(query, limit)
    }

    pub fn export(&self) -> GraphExport {
        self.graph.export()
    }

    /// Replaces the store's content with the current graph.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.graph)
    }

    /// Releases the store and hands back the graph.
    pub fn close(self) -> Result<KnowledgeGraph> {
        self.store.close()?;
        info!("knowledge base closed");
        Ok(self.graph)
    }
}
