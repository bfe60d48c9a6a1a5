use super::records::ExtractedEntity;
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Finds domain entity mentions in free text.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<ExtractedEntity>;
}

const DEFAULT_TERMS: &[(&str, &[&str])] = &[
    (
        "SATELLITE",
        &[
            "INSAT-3D", "INSAT-3DR", "INSAT-3DS", "Kalpana-1", "Oceansat-2", "Oceansat-3",
            "SCATSAT-1", "Megha-Tropiques", "SARAL", "Cartosat-2",
        ],
    ),
    (
        "SENSOR",
        &[
            "Imager", "Sounder", "OCM", "Scatterometer", "MADRAS", "SAPHIR", "AltiKa", "VHRR",
        ],
    ),
    (
        "DATA_PRODUCT",
        &[
            "Meteorological data", "Ocean color data", "Wind vector data", "Cloud motion vectors",
            "Outgoing longwave radiation",
        ],
    ),
    (
        "PARAMETER",
        &[
            "wind speed", "sea surface temperature", "rainfall", "humidity",
            "chlorophyll concentration", "sea level",
        ],
    ),
    (
        "LOCATION",
        &[
            "Indian Ocean", "Indian subcontinent", "global oceans", "Bay of Bengal",
            "Arabian Sea", "Mumbai", "India",
        ],
    ),
    ("FORMAT", &["HDF5", "NetCDF", "GeoTIFF", "CSV"]),
    ("ORGANIZATION", &["ISRO", "MOSDAC", "Space Applications Centre"]),
    ("MISSION", &["Indian National Satellite System"]),
];

/// Dictionary-based recognizer.
///
/// Terms match case-insensitively on word boundaries; longer terms win over
/// shorter ones starting at the same place, and each distinct mention is
/// reported once per text with the casing it has in the text.
pub struct GazetteerRecognizer {
    pattern: Option<Regex>,
    labels: HashMap<String, String>,
}

impl GazetteerRecognizer {
    pub fn new(terms: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut labels = HashMap::new();
        for (label, words) in &terms {
            for word in words {
                let word = word.trim();
                if !word.is_empty() {
                    labels.insert(word.to_lowercase(), label.clone());
                }
            }
        }

        let mut words: Vec<&String> = labels.keys().collect();
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        let pattern = if words.is_empty() {
            None
        } else {
            let alternation = words
                .iter()
                .map(|word| bounded(word))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()
                    .context("gazetteer pattern could not be compiled")?,
            )
        };

        Ok(Self { pattern, labels })
    }

    /// Loads a `{"LABEL": ["term", ...]}` dictionary.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read gazetteer {:?}", path))?;
        let terms: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid gazetteer JSON in {:?}", path))?;
        Self::new(terms)
    }

    pub fn term_count(&self) -> usize {
        self.labels.len()
    }
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        let terms = DEFAULT_TERMS
            .iter()
            .map(|(label, words)| {
                (
                    label.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        // the built-in dictionary is plain escaped text and always compiles
        Self::new(terms).expect("default gazetteer must compile")
    }
}

fn bounded(word: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if word.starts_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(word));
    if word.ends_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> Vec<ExtractedEntity> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for found in pattern.find_iter(text) {
            let key = found.as_str().to_lowercase();
            let Some(label) = self.labels.get(&key) else {
                continue;
            };
            if seen.insert(key) {
                entities.push(ExtractedEntity::new(found.as_str(), label.clone()));
            }
        }
        entities
    }
}
