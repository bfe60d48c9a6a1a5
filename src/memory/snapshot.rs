use super::graph::{GraphData, KnowledgeGraph};
use super::store::GraphStore;
use crate::domain::{Entity, Relationship};
use crate::error::{KgError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Point-in-time copy of a whole graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl GraphSnapshot {
    pub fn capture(graph: &KnowledgeGraph) -> Self {
        let data = graph.data();
        Self {
            saved_at: Utc::now(),
            entities: data.entities.clone(),
            relationships: data.relationships.clone(),
        }
    }

    pub fn into_graph(self) -> KnowledgeGraph {
        KnowledgeGraph::from_parts(GraphData {
            entities: self.entities,
            relationships: self.relationships,
        })
    }
}

/// Full-replace JSON file store.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored graph; a missing file yields an empty graph.
    pub fn load(&self) -> Result<KnowledgeGraph> {
        if !self.path.exists() {
            return Ok(KnowledgeGraph::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|err| KgError::io(&self.path, err))?;
        let snapshot: GraphSnapshot = serde_json::from_str(&raw)?;
        Ok(snapshot.into_graph())
    }
}

impl GraphStore for SnapshotStore {
    fn save(&self, graph: &KnowledgeGraph) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| KgError::io(parent, err))?;
        }
        let data = serde_json::to_string_pretty(&GraphSnapshot::capture(graph))?;
        fs::write(&self.path, data).map_err(|err| KgError::io(&self.path, err))?;
        info!(
            path = %self.path.display(),
            entities = graph.node_count(),
            relationships = graph.edge_count(),
            "snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{ExtractedEntity, ExtractedRelationship};
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_empty_graph() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn nan_confidence_survives_a_reload() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("graph.json"));
        let mut graph = KnowledgeGraph::new();
        graph
            .build(
                &[
                    ExtractedEntity::new("SCATSAT-1", "SATELLITE"),
                    ExtractedEntity::new("wind speed", "PARAMETER"),
                ],
                &[ExtractedRelationship::new("SCATSAT-1", "MEASURES", "wind speed")
                    .with_confidence(f64::NAN)],
            )
            .unwrap();
        store.save(&graph).unwrap();

        let loaded = store.load().unwrap();
        let edge = loaded.relationships().next().unwrap();
        assert_eq!(edge.properties.confidence, 1.0);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested").join("graph.json"));

        let mut first = KnowledgeGraph::new();
        first
            .build(
                &[
                    ExtractedEntity::new("INSAT-3D", "SATELLITE"),
                    ExtractedEntity::new("Imager", "SENSOR"),
                ],
                &[ExtractedRelationship::new("INSAT-3D", "CARRIES", "Imager")],
            )
            .unwrap();
        store.save(&first).unwrap();

        let mut second = KnowledgeGraph::new();
        second
            .build(&[ExtractedEntity::new("Oceansat-2", "SATELLITE")], &[])
            .unwrap();
        store.save(&second).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.node_count(), 1);
        assert_eq!(loaded.edge_count(), 0);
        assert_eq!(loaded.entities().next().unwrap().name(), "Oceansat-2");
    }

    #[test]
    fn round_trip_keeps_ids_and_edges() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("graph.json"));
        let mut graph = KnowledgeGraph::new();
        graph
            .build(
                &[
                    ExtractedEntity::new("INSAT-3D", "SATELLITE"),
                    ExtractedEntity::new("Meteorological data", "DATA_PRODUCT"),
                ],
                &[ExtractedRelationship::new("INSAT-3D", "PROVIDES", "Meteorological data")],
            )
            .unwrap();
        store.save(&graph).unwrap();

        let loaded = store.load().unwrap();
        let original: Vec<_> = graph.entities().map(|e| e.id).collect();
        let restored: Vec<_> = loaded.entities().map(|e| e.id).collect();
        assert_eq!(original, restored);
        let edge = loaded.relationships().next().unwrap();
        assert!(loaded.get_entity(&edge.source_id).is_some());
        assert_eq!(edge.kind.as_str(), "PROVIDES");
    }
}
