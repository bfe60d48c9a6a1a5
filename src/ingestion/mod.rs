mod assembler;
mod documents;
mod extractor;
mod pipeline;
mod recognizer;
mod records;
mod validator;

pub use assembler::BuildReport;
pub use documents::{load_documents, CrawledDocument};
pub use extractor::RelationshipExtractor;
pub use pipeline::ExtractionPipeline;
pub use recognizer::{EntityRecognizer, GazetteerRecognizer};
pub use records::{ExtractedEntity, ExtractedRelationship, ExtractionBatch};
pub use validator::validate_batch;
