//! From derived features to a default probability.
//!
//! `schema` fixes the column layout, `record` assembles a row in that layout,
//! `classifier` is the seam to the trained model, `score` turns a row into a
//! probability, and `assess` runs the whole sequence with its fallbacks.

pub mod assess;
pub mod classifier;
pub mod record;
pub mod schema;
pub mod score;

pub use assess::{assess, RiskAssessment};
pub use classifier::{Classifier, LogisticModel, StandardScaler, DEFAULT_CLASS};
pub use record::{build_scoring_record, ScoringRecord};
pub use schema::{FeatureField, FeatureSchema, SchemaColumn};
pub use score::{mock_score, score, score_with_rng, MockConfig, Probability, ProbabilitySource};
