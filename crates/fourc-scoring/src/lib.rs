//! fourc-scoring
//!
//! The 4C Mortality Score engine. Pure data and in-memory state, no I/O.
//! [`ScoreTable`] is the read-only catalog of variables, mortality curve and
//! risk bands; [`Session`] accumulates one user's answers into a total score.

pub mod error;
pub mod isaric4c;
pub mod plot;
pub mod scoring;
pub mod session;
pub mod table;

pub use error::{CatalogError, ScoreError};
pub use plot::{PlotPoint, PlotSink, PlotUpdate};
pub use scoring::{
    RiskBand, ScoreResult, TotalScore, UnitMapping, UnitSystem, ValueScore, VariableDefinition,
};
pub use session::{Selection, Session, SessionState};
pub use table::ScoreTable;
