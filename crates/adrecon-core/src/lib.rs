//! adrecon-core - Core library for adrecon
//!
//! Reconciles a GAM delivery export against a CM360 export: both are
//! normalized into [`Dataset`]s, joined by three independent match
//! strategies, and every matched group whose aggregated GAM metrics disagree
//! with CM360 is reported as a [`MatchCandidate`].

pub mod config;
pub mod detect;
pub mod error;
pub mod matcher;
pub mod namespace;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod schema;
pub mod sql_utils;

pub use config::{Config, Engine, MatchingConfig};
pub use detect::{detect, MatchCandidate};
pub use error::{CoreError, CoreResult};
pub use matcher::{InMemoryMatcher, MatchGroup, MatchOutcome, MatchStrategy, MatchType};
pub use namespace::Namespace;
pub use normalize::{normalize, NormalizeOptions};
pub use record::{Dataset, RawDataset, Record, SourceTag};
pub use report::{ComparisonReport, ReportOptions};
pub use schema::SideSchema;
