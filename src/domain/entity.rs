use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Provenance tag stamped on every entity assembled from extraction output.
pub const PROVENANCE_NER: &str = "ner_extraction";

/// Keys owned by the entity itself; they never live in the residual property map.
const RESERVED_KEYS: &[&str] = &["id", "label", "type", "name", "created_from"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical domain category of an entity.
///
/// Raw extractor labels are folded through a fixed table; anything the table
/// does not know is carried through verbatim as [`EntityType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Mission,
    Instrument,
    Product,
    GeographicArea,
    MeasurementType,
    Organization,
    DataFormat,
    Specification,
    Other(String),
}

impl EntityType {
    /// Exact, case-sensitive lookup: `"satellite"` is not `"SATELLITE"`.
    pub fn from_raw_label(raw: &str) -> Self {
        match raw {
            "SATELLITE" | "MISSION" => EntityType::Mission,
            "SENSOR" => EntityType::Instrument,
            "DATA_PRODUCT" => EntityType::Product,
            "LOCATION" => EntityType::GeographicArea,
            "PARAMETER" => EntityType::MeasurementType,
            "ORGANIZATION" => EntityType::Organization,
            "FORMAT" => EntityType::DataFormat,
            "RESOLUTION" => EntityType::Specification,
            _ => EntityType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Mission => "Mission",
            EntityType::Instrument => "Instrument",
            EntityType::Product => "Product",
            EntityType::GeographicArea => "GeographicArea",
            EntityType::MeasurementType => "MeasurementType",
            EntityType::Organization => "Organization",
            EntityType::DataFormat => "DataFormat",
            EntityType::Specification => "Specification",
            EntityType::Other(raw) => raw,
        }
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Mission" => EntityType::Mission,
            "Instrument" => EntityType::Instrument,
            "Product" => EntityType::Product,
            "GeographicArea" => EntityType::GeographicArea,
            "MeasurementType" => EntityType::MeasurementType,
            "Organization" => EntityType::Organization,
            "DataFormat" => EntityType::DataFormat,
            "Specification" => EntityType::Specification,
            _ => EntityType::Other(value),
        }
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        match value {
            EntityType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProperties {
    pub name: String,
    pub created_from: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EntityProperties {
    /// Builds the property bag for `name`, keeping only the non-reserved
    /// producer-supplied keys.
    pub fn new(name: impl Into<String>, supplied: BTreeMap<String, Value>) -> Self {
        let extra = supplied
            .into_iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .collect();
        Self {
            name: name.into(),
            created_from: PROVENANCE_NER.to_string(),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub properties: EntityProperties,
}

impl Entity {
    pub fn new(label: impl Into<String>, kind: EntityType, supplied: BTreeMap<String, Value>) -> Self {
        let label = label.into();
        Self {
            id: EntityId::new(),
            properties: EntityProperties::new(label.clone(), supplied),
            label,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }
}
