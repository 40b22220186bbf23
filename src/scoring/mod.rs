pub mod composite;
pub mod keywords;
pub mod recommend;

pub use composite::CompositeScorer;
pub use keywords::{KeywordMatches, KeywordScorer};
pub use recommend::RecommendationCatalog;
