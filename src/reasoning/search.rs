use super::traversal::{GraphQueryEngine, RelatedEntity};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Hop bound used for every keyword lookup.
const SEARCH_DEPTH: usize = 2;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "what", "how", "where", "when", "why",
];

/// Lower-cased word tokens of `query` minus stop words and tokens of two
/// characters or fewer, in order of first appearance.
pub fn extract_key_terms(query: &str) -> Vec<String> {
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());
    let lowered = query.to_lowercase();
    let mut seen = HashSet::new();
    WORD.find_iter(&lowered)
        .map(|token| token.as_str())
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .filter(|token| seen.insert(token.to_string()))
        .map(str::to_string)
        .collect()
}

impl GraphQueryEngine<'_> {
    /// Graph-proximity search: the union of `find_related` over every key term.
    ///
    /// An entity found through several terms keeps the position it was first
    /// seen at and the smallest distance any term reached it with.
    pub fn search(&self, query: &str, limit: usize) -> Vec<RelatedEntity> {
        let mut results: Vec<RelatedEntity> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for term in extract_key_terms(query) {
            for candidate in self.find_related(&term, SEARCH_DEPTH) {
                match by_name.get(&candidate.name) {
                    Some(&slot) => {
                        if candidate.distance < results[slot].distance {
                            results[slot] = candidate;
                        }
                    }
                    None => {
                        by_name.insert(candidate.name.clone(), results.len());
                        results.push(candidate);
                    }
                }
            }
        }

        results.truncate(limit);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::fixtures::portal_graph;

    #[test]
    fn key_terms_drop_stop_words_and_short_tokens() {
        assert_eq!(
            extract_key_terms("How do I download INSAT-3D data in HDF5? Data, again!"),
            vec!["download", "insat", "data", "hdf5", "again"]
        );
        assert!(extract_key_terms("What is it?").is_empty());
    }

    #[test]
    fn union_keeps_the_closest_match() {
        let graph = portal_graph();
        let results = GraphQueryEngine::new(&graph).search("Where is INSAT data available?", 10);
        let summary: Vec<_> = results
            .iter()
            .map(|r| (r.name.as_str(), r.distance))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ISRO", 1),
                ("Imager", 1),
                ("Meteorological data", 1),
                ("Sounder", 1),
                ("HDF5", 1),
                ("INSAT-3D", 1),
                ("INSAT-3DR", 2),
                ("Indian Ocean", 1),
            ]
        );
    }

    #[test]
    fn never_exceeds_limit_and_never_loses_a_closer_hit() {
        let graph = portal_graph();
        let engine = GraphQueryEngine::new(&graph);
        let query = "insat imager hdf5 ocean data";
        for limit in 0..12 {
            assert!(engine.search(query, limit).len() <= limit);
        }

        let results = engine.search(query, 50);
        let names: HashSet<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), results.len());
        for term in extract_key_terms(query) {
            for hit in engine.find_related(&term, SEARCH_DEPTH) {
                let kept = results.iter().find(|r| r.name == hit.name).unwrap();
                assert!(kept.distance <= hit.distance);
            }
        }
    }

    #[test]
    fn queries_without_key_terms_find_nothing() {
        let graph = portal_graph();
        assert!(GraphQueryEngine::new(&graph).search("how is it", 10).is_empty());
    }
}
