mod entity;
mod relationship;

pub use entity::{Entity, EntityId, EntityProperties, EntityType, PROVENANCE_NER};
pub use relationship::{Relationship, RelationshipId, RelationshipProperties, RelationType};
