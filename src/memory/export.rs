use super::graph::KnowledgeGraph;
use crate::domain::{EntityId, EntityProperties, EntityType, RelationType, RelationshipId, RelationshipProperties};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    pub id: EntityId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[serde(flatten)]
    pub properties: EntityProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportEdge {
    pub id: RelationshipId,
    pub source: EntityId,
    pub target: EntityId,
    #[serde(rename = "type")]
    pub kind: RelationType,
    #[serde(flatten)]
    pub properties: RelationshipProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub node_types: BTreeSet<String>,
    pub relationship_types: BTreeSet<String>,
}

/// Visualization-friendly flat view of a graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
    pub stats: GraphStats,
}

impl KnowledgeGraph {
    pub fn export(&self) -> GraphExport {
        let nodes: Vec<ExportNode> = self
            .entities()
            .map(|entity| ExportNode {
                id: entity.id,
                label: entity.label.clone(),
                kind: entity.kind.clone(),
                properties: entity.properties.clone(),
            })
            .collect();
        let edges: Vec<ExportEdge> = self
            .relationships()
            .map(|relationship| ExportEdge {
                id: relationship.id,
                source: relationship.source_id,
                target: relationship.target_id,
                kind: relationship.kind.clone(),
                properties: relationship.properties.clone(),
            })
            .collect();
        let stats = GraphStats {
            node_count: nodes.len(),
            edge_count: edges.len(),
            node_types: nodes.iter().map(|n| n.kind.to_string()).collect(),
            relationship_types: edges.iter().map(|e| e.kind.to_string()).collect(),
        };
        GraphExport {
            nodes,
            edges,
            stats,
        }
    }
}
