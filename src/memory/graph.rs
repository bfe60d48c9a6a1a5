use crate::domain::{Entity, EntityId, Relationship};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct GraphData {
    pub(crate) entities: Vec<Entity>,
    pub(crate) relationships: Vec<Relationship>,
}

/// In-memory directed multigraph.
///
/// Nodes and edges keep insertion order; parallel edges between the same pair
/// are allowed. Entities are never removed individually.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    data: GraphData,
    positions: HashMap<EntityId, usize>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(data: GraphData) -> Self {
        let positions = data
            .entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.id, index))
            .collect();
        Self { data, positions }
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.data.entities.iter()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.data.relationships.iter()
    }

    pub fn node_count(&self) -> usize {
        self.data.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.data.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entities.is_empty()
    }

    pub fn get_entity(&self, id: &EntityId) -> Option<&Entity> {
        self.positions.get(id).map(|&index| &self.data.entities[index])
    }

    /// Insertion rank of an entity, used as the final ordering tie-break.
    pub(crate) fn position(&self, id: &EntityId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.positions.insert(id, self.data.entities.len());
        self.data.entities.push(entity);
        id
    }

    /// Adds an edge; returns `false` without touching the graph when either
    /// endpoint is not a node of this graph.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        if !self.positions.contains_key(&relationship.source_id)
            || !self.positions.contains_key(&relationship.target_id)
        {
            return false;
        }
        self.data.relationships.push(relationship);
        true
    }

    /// Entities whose name contains `needle`, compared case-insensitively.
    ///
    /// The needle is used as given, surrounding spaces included; a blank
    /// needle matches nothing.
    pub fn find_by_name_fragment<'a>(&'a self, needle: &str) -> Vec<&'a Entity> {
        if needle.trim().is_empty() {
            return Vec::new();
        }
        let needle = needle.to_lowercase();
        self.data
            .entities
            .iter()
            .filter(|entity| entity.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Undirected adjacency: for every node, the edges touching it in insertion order.
    pub(crate) fn adjacency(&self) -> HashMap<EntityId, Vec<&Relationship>> {
        let mut adjacency: HashMap<EntityId, Vec<&Relationship>> = HashMap::new();
        for relationship in &self.data.relationships {
            adjacency
                .entry(relationship.source_id)
                .or_default()
                .push(relationship);
            if relationship.target_id != relationship.source_id {
                adjacency
                    .entry(relationship.target_id)
                    .or_default()
                    .push(relationship);
            }
        }
        adjacency
    }

    pub(crate) fn data(&self) -> &GraphData {
        &self.data
    }
}
