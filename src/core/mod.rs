pub mod engine;
pub mod pagination;
pub mod scoring;

pub use crate::domain::model::{BusinessUnit, Lookup, Review, ReviewPage, TrustScoreResult};
pub use crate::domain::ports::{ConfigProvider, Resolver, ReviewTransport};
pub use crate::utils::error::Result;
