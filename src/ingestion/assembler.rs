use super::records::{ExtractedEntity, ExtractedRelationship};
use super::validator::validate_batch;
use crate::domain::{Entity, EntityId, EntityType, Relationship, RelationshipProperties};
use crate::error::Result;
use crate::memory::KnowledgeGraph;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What one `build` pass added to the graph.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub entities_added: usize,
    pub relationships_added: usize,
    /// Lower-cased entity text to the node relationships resolve against.
    /// Later mentions of the same text replace earlier ones.
    pub resolution_index: BTreeMap<String, EntityId>,
}

impl KnowledgeGraph {
    /// Adds one batch of extraction output to the graph.
    ///
    /// Every entity record becomes a new node. A relationship becomes an edge
    /// only when both its subject and object match (case-insensitively, exact
    /// text) an entity of this same batch; otherwise it is skipped without
    /// error. Nothing is merged with what the graph already holds, so building
    /// the same batch twice doubles it.
    ///
    /// The batch is validated up front: a malformed record fails the call and
    /// leaves the graph untouched.
    pub fn build(
        &mut self,
        entities: &[ExtractedEntity],
        relationships: &[ExtractedRelationship],
    ) -> Result<BuildReport> {
        let predicates = validate_batch(entities, relationships)?;
        let mut report = BuildReport::default();

        for record in entities {
            let entity = Entity::new(
                record.text.clone(),
                EntityType::from_raw_label(&record.label),
                record.properties.clone(),
            );
            let id = self.add_entity(entity);
            report.resolution_index.insert(record.text.to_lowercase(), id);
            report.entities_added += 1;
        }

        for (record, kind) in relationships.iter().zip(predicates) {
            let subject = report.resolution_index.get(&record.subject.to_lowercase());
            let object = report.resolution_index.get(&record.object.to_lowercase());
            let (Some(&source_id), Some(&target_id)) = (subject, object) else {
                debug!(
                    subject = %record.subject,
                    predicate = %kind,
                    object = %record.object,
                    "unresolved relationship skipped"
                );
                continue;
            };
            let properties =
                RelationshipProperties::new(record.confidence, record.source_text.clone());
            if self.add_relationship(Relationship::new(source_id, target_id, kind, properties)) {
                report.relationships_added += 1;
            }
        }

        info!(
            entities = report.entities_added,
            relationships = report.relationships_added,
            nodes = self.node_count(),
            edges = self.edge_count(),
            "extraction batch assembled"
        );
        Ok(report)
    }
}
