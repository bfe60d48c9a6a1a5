use super::documents::CrawledDocument;
use super::extractor::RelationshipExtractor;
use super::recognizer::EntityRecognizer;
use super::records::ExtractionBatch;
use std::sync::Arc;
use tracing::info;

/// Turns crawled pages into one extraction batch.
pub struct ExtractionPipeline<R: EntityRecognizer> {
    recognizer: Arc<R>,
    extractor: RelationshipExtractor,
}

impl<R: EntityRecognizer> ExtractionPipeline<R> {
    pub fn new(recognizer: Arc<R>) -> Self {
        Self {
            recognizer,
            extractor: RelationshipExtractor::new(),
        }
    }

    pub fn extract_text(&self, text: &str) -> ExtractionBatch {
        ExtractionBatch {
            entities: self.recognizer.recognize(text),
            relationships: self.extractor.extract(text),
        }
    }

    pub fn extract(&self, documents: &[CrawledDocument]) -> ExtractionBatch {
        let mut batch = ExtractionBatch::default();
        let mut processed = 0usize;
        for document in documents {
            if document.content.trim().is_empty() {
                continue;
            }
            batch.extend(self.extract_text(&document.content));
            processed += 1;
        }
        info!(
            documents = processed,
            entities = batch.entities.len(),
            relationships = batch.relationships.len(),
            "extraction finished"
        );
        batch
    }
}
