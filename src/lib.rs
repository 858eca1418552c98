#![warn(clippy::all, rust_2018_idioms)]

//! Histogram filling for underlying-event measurements.
//!
//! Events carrying generator-level and reconstructed observables are binned
//! into pre-booked marginal histograms, migration matrices and regional
//! response matrices, ready for unfolding.

pub mod analysis;
pub mod error;
pub mod histoer;

pub use analysis::booking::BookingConfig;
pub use analysis::event::{RegionalView, UEEvent, UEEventRecord};
pub use analysis::handler::{SliceSpec, UEAnalysisHandler};
pub use analysis::keys::{AxisKey, DifferentialKey, DifferentialKind, InclusiveKey, InclusiveKind};
pub use analysis::regions::{Level, Region};
pub use analysis::registry::{AxisRegistry, Histo, HistogramRegistry};
pub use analysis::systematics::SYSTS;
pub use analysis::variables::{VARS, Var};
pub use error::UEError;
pub use histoer::axis::Axis;
pub use histoer::histo1d::histogram1d::Histogram;
pub use histoer::histo2d::histogram2d::Histogram2D;
