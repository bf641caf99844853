pub mod attributes;
pub mod combo;
pub mod schema;

// Re-export for convenience
pub use attributes::{decode_attributes, decode_encoded};
pub use combo::{
    parse_price, split_candidates, strip_price, ComboNormalizer, NormalizationError,
    CANDIDATE_SEPARATOR, MIN_CATEGORIES,
};
pub use schema::*;
