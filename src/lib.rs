pub mod domain;
pub mod error;
pub mod ingestion;
pub mod memory;
pub mod reasoning;
pub mod service;

pub use domain::{Entity, EntityId, EntityType, Relationship, RelationType};
pub use error::{KgError, Result};
pub use ingestion::{BuildReport, ExtractedEntity, ExtractedRelationship, ExtractionBatch};
pub use memory::{GraphExport, GraphStore, KnowledgeGraph, MemoryStore, Neo4jConfig, Neo4jStore, SnapshotStore};
pub use reasoning::{EntityDetails, GraphQueryEngine, RelatedEntity};
pub use service::KnowledgeBase;
