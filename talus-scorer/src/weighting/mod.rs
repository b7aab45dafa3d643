//! Independent scalar weighting functions.
//!
//! Each weighting is built once from its [`ScoringConfig`](crate::ScoringConfig)
//! section and then evaluated many times. Every function is pure and total:
//! missing optional inputs return the documented neutral value.

mod categorical;
mod elevation;
mod grade;
mod spatial;
mod temporal;

pub use categorical::{RouteTypeWeighting, SeverityWeighting};
pub use elevation::ElevationWeighting;
pub use grade::GradeWeighting;
pub use spatial::SpatialWeighting;
pub use temporal::{TemporalWeight, TemporalWeighting};
