use crate::error::KgError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub Uuid);

impl RelationshipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Predicate label of an edge.
///
/// Always an upper-case identifier made of `[A-Z0-9_]` starting with a letter,
/// so it can be written as a relationship type in a Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationType(String);

impl RelationType {
    pub fn parse(raw: &str) -> Result<Self, KgError> {
        static INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9_]+").unwrap());
        let upper = raw.trim().to_uppercase();
        let replaced = INVALID.replace_all(&upper, "_");
        let token = replaced.trim_matches('_');
        if token.is_empty() {
            return Err(KgError::InvalidRelationType(raw.to_string()));
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Self(format!("R_{}", token)));
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RelationType {
    type Err = KgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelationType {
    type Error = KgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelationType> for String {
    fn from(value: RelationType) -> Self {
        value.0
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipProperties {
    pub confidence: f64,
    #[serde(default)]
    pub source_text: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RelationshipProperties {
    /// Confidence is clamped into `[0, 1]`; missing or non-finite values fall
    /// back to 1.0.
    pub fn new(confidence: Option<f64>, source_text: Option<String>) -> Self {
        Self {
            confidence: confidence
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(1.0),
            source_text: source_text.unwrap_or_default(),
            extra: BTreeMap::new(),
        }
    }
}

impl Default for RelationshipProperties {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    #[serde(rename = "type")]
    pub kind: RelationType,
    pub properties: RelationshipProperties,
}

impl Relationship {
    pub fn new(
        source_id: EntityId,
        target_id: EntityId,
        kind: RelationType,
        properties: RelationshipProperties,
    ) -> Self {
        Self {
            id: RelationshipId::new(),
            source_id,
            target_id,
            kind,
            properties,
        }
    }

    pub fn touches(&self, id: &EntityId) -> bool {
        self.source_id == *id || self.target_id == *id
    }
}
