use super::records::ExtractedRelationship;
use once_cell::sync::Lazy;
use regex::Regex;

const PATTERN_CONFIDENCE: f64 = 0.8;

struct RelationPattern {
    regex: Regex,
    predicate: &'static str,
}

static PATTERNS: Lazy<Vec<RelationPattern>> = Lazy::new(|| {
    [
        (r"(?i)(\w+)\s+(provides|generates|produces)\s+(.+)", "PROVIDES"),
        (r"(?i)(\w+)\s+(measures|captures|monitors)\s+(.+)", "MEASURES"),
        (r"(?i)(.+)\s+(covers|over|for)\s+(.+)", "COVERS"),
        (r"(?i)(.+)\s+(in|format)\s+(\w+)\s+format", "FORMAT"),
    ]
    .into_iter()
    .map(|(pattern, predicate)| RelationPattern {
        regex: Regex::new(pattern).unwrap(),
        predicate,
    })
    .collect()
});

/// Pattern-table relationship extraction over raw text.
///
/// Each pattern is applied independently over the whole text; its matches do
/// not overlap each other but may overlap those of other patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipExtractor;

impl RelationshipExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Vec<ExtractedRelationship> {
        let mut relationships = Vec::new();
        for pattern in PATTERNS.iter() {
            for captures in pattern.regex.captures_iter(text) {
                let (Some(whole), Some(subject), Some(object)) =
                    (captures.get(0), captures.get(1), captures.get(3))
                else {
                    continue;
                };
                relationships.push(
                    ExtractedRelationship::new(
                        subject.as_str().trim(),
                        pattern.predicate,
                        object.as_str().trim(),
                    )
                    .with_confidence(PATTERN_CONFIDENCE)
                    .with_source_text(whole.as_str()),
                );
            }
        }
        relationships
    }
}
