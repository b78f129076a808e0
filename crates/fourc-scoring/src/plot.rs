use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::RiskBand;

/// The values a plotting collaborator draws for the current session.
///
/// All three fields are `None` until every variable has been answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlotUpdate {
    pub score: Option<u32>,
    pub band: Option<RiskBand>,
    pub mortality: Option<f64>,
}

/// One bar/point of the combined risk plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlotPoint {
    pub score: u32,
    /// Validation-cohort patients observed at this score.
    pub patients: u32,
    pub mortality: f64,
    pub color: String,
}

/// Receives plot updates from a session. Sinks only observe; they cannot
/// reach back into the session.
pub trait PlotSink: Send + Sync {
    fn update(&self, update: &PlotUpdate);
}

impl<F> PlotSink for F
where
    F: Fn(&PlotUpdate) + Send + Sync,
{
    fn update(&self, update: &PlotUpdate) {
        self(update)
    }
}
