mod export;
mod graph;
mod neo4j;
mod snapshot;
mod store;

pub use export::{ExportEdge, ExportNode, GraphExport, GraphStats};
pub use graph::KnowledgeGraph;
pub use neo4j::{
    clear_statement, entity_statement, relationship_statement, Neo4jConfig, Neo4jStore, Record,
    Statement,
};
pub use snapshot::{GraphSnapshot, SnapshotStore};
pub use store::{GraphStore, MemoryStore};
