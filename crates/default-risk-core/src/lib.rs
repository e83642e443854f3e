pub mod applicant;
pub mod config;
pub mod error;
pub mod features;
pub mod scoring;
pub mod types;

pub use error::RiskError;
pub use types::*;

/// Standard result type for all default-risk operations
pub type RiskResult<T> = Result<T, RiskError>;
