//! `packmatch-recon`: field normalization and document matching engine.
//!
//! Pure engine crate: inputs and output arrive through the traits in
//! [`source`] and [`engine::SourceOpener`]. No file format dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod output;
pub mod source;

pub use config::MatchConfig;
pub use engine::{run, MatchRequest, SourceOpener};
pub use error::MatchError;
pub use model::{FieldMatches, RawValue, RunReport, SheetPlan, Stage};
pub use source::{DocumentSource, ResultSink, TabularSource};
