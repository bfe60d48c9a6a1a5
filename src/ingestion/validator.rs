use super::records::{ExtractedEntity, ExtractedRelationship};
use crate::domain::RelationType;
use crate::error::{KgError, RecordKind, Result};

fn require(value: &str, kind: RecordKind, index: usize, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KgError::MalformedInput { kind, index, field });
    }
    Ok(())
}

/// Checks a whole batch before anything is written to the graph.
///
/// Returns the sanitized predicate of every relationship, in input order. The
/// first malformed record rejects the batch.
pub fn validate_batch(
    entities: &[ExtractedEntity],
    relationships: &[ExtractedRelationship],
) -> Result<Vec<RelationType>> {
    for (index, entity) in entities.iter().enumerate() {
        require(&entity.text, RecordKind::Entity, index, "text")?;
        require(&entity.label, RecordKind::Entity, index, "label")?;
    }

    let mut predicates = Vec::with_capacity(relationships.len());
    for (index, relationship) in relationships.iter().enumerate() {
        require(&relationship.subject, RecordKind::Relationship, index, "subject")?;
        require(&relationship.object, RecordKind::Relationship, index, "object")?;
        let kind = RelationType::parse(&relationship.predicate).map_err(|_| {
            KgError::MalformedInput {
                kind: RecordKind::Relationship,
                index,
                field: "predicate",
            }
        })?;
        predicates.push(kind);
    }
    Ok(predicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_first_offending_record() {
        let entities = vec![
            ExtractedEntity::new("INSAT-3D", "SATELLITE"),
            ExtractedEntity::new("   ", "SENSOR"),
        ];
        let err = validate_batch(&entities, &[]).unwrap_err();
        assert!(matches!(
            err,
            KgError::MalformedInput {
                kind: RecordKind::Entity,
                index: 1,
                field: "text"
            }
        ));
    }

    #[test]
    fn predicates_that_sanitize_to_nothing_are_malformed() {
        let relationships = vec![
            ExtractedRelationship::new("a", "PROVIDES", "b"),
            ExtractedRelationship::new("a", "->", "b"),
        ];
        let err = validate_batch(&[], &relationships).unwrap_err();
        assert!(matches!(
            err,
            KgError::MalformedInput {
                kind: RecordKind::Relationship,
                index: 1,
                field: "predicate"
            }
        ));
    }

    #[test]
    fn valid_batch_yields_one_type_per_relationship() {
        let relationships = vec![
            ExtractedRelationship::new("a", "provides", "b"),
            ExtractedRelationship::new("b", "covers", "c"),
        ];
        let kinds = validate_batch(&[], &relationships).unwrap();
        let names: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["PROVIDES", "COVERS"]);
    }
}
