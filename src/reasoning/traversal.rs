use crate::domain::{EntityId, EntityType, RelationType};
use crate::memory::KnowledgeGraph;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Most entries `find_related` ever returns; narrower names are the only way
/// past it.
pub const RELATED_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub distance: usize,
    pub relationship_path: Vec<RelationType>,
}

/// Read-only queries over a [`KnowledgeGraph`].
pub struct GraphQueryEngine<'a> {
    pub(crate) graph: &'a KnowledgeGraph,
}

impl<'a> GraphQueryEngine<'a> {
    pub fn new(graph: &'a KnowledgeGraph) -> Self {
        Self { graph }
    }

    /// Entities within `max_depth` hops (edges followed in both directions) of
    /// any entity whose name contains `entity_name`, case-insensitively.
    ///
    /// Each entity appears once with its shortest distance and the edge types
    /// along that path. Sorted by distance, then name, then insertion order,
    /// and capped at [`RELATED_LIMIT`].
    pub fn find_related(&self, entity_name: &str, max_depth: usize) -> Vec<RelatedEntity> {
        if max_depth == 0 {
            return Vec::new();
        }
        let starts = self.graph.find_by_name_fragment(entity_name);
        if starts.is_empty() {
            return Vec::new();
        }

        let adjacency = self.graph.adjacency();
        let mut best: HashMap<EntityId, Vec<&RelationType>> = HashMap::new();

        for start in starts {
            let mut visited: HashSet<EntityId> = HashSet::from([start.id]);
            let mut queue: VecDeque<(EntityId, Vec<&RelationType>)> = VecDeque::new();
            queue.push_back((start.id, Vec::new()));

            while let Some((current, path)) = queue.pop_front() {
                if path.len() >= max_depth {
                    continue;
                }
                let Some(edges) = adjacency.get(&current) else {
                    continue;
                };
                for relationship in edges {
                    let next = if relationship.source_id == current {
                        relationship.target_id
                    } else {
                        relationship.source_id
                    };
                    if !visited.insert(next) {
                        continue;
                    }
                    let mut next_path = path.clone();
                    next_path.push(&relationship.kind);
                    let shorter = best
                        .get(&next)
                        .map_or(true, |known| next_path.len() < known.len());
                    if shorter {
                        best.insert(next, next_path.clone());
                    }
                    queue.push_back((next, next_path));
                }
            }
        }

        let mut related: Vec<(usize, RelatedEntity)> = best
            .into_iter()
            .filter_map(|(id, path)| {
                let entity = self.graph.get_entity(&id)?;
                let rank = self.graph.position(&id)?;
                Some((
                    rank,
                    RelatedEntity {
                        name: entity.name().to_string(),
                        kind: entity.kind.clone(),
                        distance: path.len(),
                        relationship_path: path.into_iter().cloned().collect(),
                    },
                ))
            })
            .collect();
        related.sort_by(|(rank_a, a), (rank_b, b)| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.name.cmp(&b.name))
                .then(rank_a.cmp(rank_b))
        });
        related.truncate(RELATED_LIMIT);
        related.into_iter().map(|(_, entity)| entity).collect()
    }
}
