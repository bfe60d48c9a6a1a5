mod details;
mod search;
mod traversal;

pub use details::{Direction, EntityDetails, RelatedLink};
pub use search::extract_key_terms;
pub use traversal::{GraphQueryEngine, RelatedEntity, RELATED_LIMIT};
