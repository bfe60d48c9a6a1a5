use super::traversal::GraphQueryEngine;
use crate::domain::{EntityProperties, EntityType, RelationType};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelatedLink {
    pub related_entity: String,
    pub relationship: RelationType,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDetails {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub properties: EntityProperties,
    pub relationships: Vec<RelatedLink>,
}

impl GraphQueryEngine<'_> {
    /// Details of the first entity whose name contains `entity_name`.
    ///
    /// "First" is the smallest lower-cased name, then the earliest inserted.
    pub fn get_entity_details(&self, entity_name: &str) -> Option<EntityDetails> {
        let entity = self
            .graph
            .find_by_name_fragment(entity_name)
            .into_iter()
            .min_by_key(|candidate| candidate.name().to_lowercase())?;

        let mut seen = HashSet::new();
        let mut relationships = Vec::new();
        for relationship in self.graph.relationships().filter(|r| r.touches(&entity.id)) {
            let (direction, other) = if relationship.source_id == entity.id {
                (Direction::Outgoing, relationship.target_id)
            } else {
                (Direction::Incoming, relationship.source_id)
            };
            let Some(related) = self.graph.get_entity(&other) else {
                continue;
            };
            let link = RelatedLink {
                related_entity: related.name().to_string(),
                relationship: relationship.kind.clone(),
                direction,
            };
            if seen.insert(link.clone()) {
                relationships.push(link);
            }
        }

        Some(EntityDetails {
            name: entity.name().to_string(),
            kind: entity.kind.clone(),
            properties: entity.properties.clone(),
            relationships,
        })
    }
}
