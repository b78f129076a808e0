use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ScoreError;
use crate::plot::{PlotSink, PlotUpdate};
use crate::scoring::{ScoreResult, TotalScore, UnitSystem, VariableDefinition};
use crate::table::ScoreTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionState {
    /// At least one variable has never been answered.
    Incomplete,
    /// Every variable has a current answer.
    Complete,
}

/// A recorded answer. `option` is the value's position, shared by every unit
/// mapping of the variable, so the answer survives a unit toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub option: usize,
    pub points: u32,
}

/// Selection state for one calculator session.
///
/// Answers are kept per variable and the total is summed afresh on every
/// read, so the order in which variables are answered (or re-answered) never
/// affects the result.
pub struct Session {
    table: Arc<ScoreTable>,
    selections: BTreeMap<String, Selection>,
    units: BTreeMap<String, UnitSystem>,
    sinks: Vec<Box<dyn PlotSink>>,
    last_update: PlotUpdate,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("selections", &self.selections)
            .field("units", &self.units)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(table: Arc<ScoreTable>) -> Self {
        Self {
            table,
            selections: BTreeMap::new(),
            units: BTreeMap::new(),
            sinks: Vec::new(),
            last_update: PlotUpdate::default(),
        }
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn state(&self) -> SessionState {
        if self.answered() < self.table.list_variables().len() {
            SessionState::Incomplete
        } else {
            SessionState::Complete
        }
    }

    /// Number of variables with a current answer.
    pub fn answered(&self) -> usize {
        self.selections.len()
    }

    /// Record `label` for `key`, resolved against whichever unit mapping the
    /// variable currently displays. Returns the points recorded.
    pub fn select_value(&mut self, key: &str, label: &str) -> Result<u32, ScoreError> {
        let table = Arc::clone(&self.table);
        let variable = lookup(&table, key)?;
        let mapping = variable.mapping(self.unit_system(key));

        let option = mapping
            .position(label)
            .ok_or_else(|| ScoreError::UnknownValue {
                variable: key.to_string(),
                label: label.to_string(),
            })?;
        let points = mapping.value_scores[option].points;

        self.selections
            .insert(variable.key.clone(), Selection { option, points });
        tracing::debug!(variable = key, label, points, "value selected");

        self.notify();
        Ok(points)
    }

    /// Sum of all contributions, or `None` while any variable is unanswered.
    pub fn current_total(&self) -> Option<TotalScore> {
        match self.state() {
            SessionState::Incomplete => None,
            SessionState::Complete => Some(TotalScore::new(
                self.selections.values().map(|s| s.points).sum(),
            )),
        }
    }

    /// Band and mortality for `total`.
    ///
    /// A `TotalScore` is not tied to the table that produced it; one taken
    /// from a session over a larger table fails here with `OutOfRange`.
    pub fn result_for(&self, total: TotalScore) -> Result<ScoreResult, ScoreError> {
        self.table.result(total.value())
    }

    /// The current result, if the session is complete.
    pub fn result(&self) -> Result<Option<ScoreResult>, ScoreError> {
        self.current_total()
            .map(|total| self.result_for(total))
            .transpose()
    }

    pub fn selection(&self, key: &str) -> Option<Selection> {
        self.selections.get(key).copied()
    }

    /// Points recorded for `key`, if it has been answered.
    pub fn contribution(&self, key: &str) -> Option<u32> {
        self.selection(key).map(|s| s.points)
    }

    pub fn unit_system(&self, key: &str) -> UnitSystem {
        self.units.get(key).copied().unwrap_or_default()
    }

    /// Switch the mapping `key` is displayed and selected in. The recorded
    /// answer is untouched.
    pub fn set_unit_system(&mut self, key: &str, units: UnitSystem) -> Result<(), ScoreError> {
        let variable = lookup(&self.table, key)?;
        if units == UnitSystem::Alternate && !variable.has_alternate() {
            return Err(ScoreError::NoAlternateUnits(key.to_string()));
        }
        let key = variable.key.clone();

        tracing::debug!(variable = %key, ?units, "unit system changed");
        self.units.insert(key, units);
        Ok(())
    }

    pub fn toggle_units(&mut self, key: &str) -> Result<UnitSystem, ScoreError> {
        let units = self.unit_system(key).toggled();
        self.set_unit_system(key, units)?;
        Ok(units)
    }

    /// Label of the recorded answer for `key` in the currently displayed
    /// units, or `None` if unanswered.
    pub fn highlighted_label(&self, key: &str) -> Result<Option<&str>, ScoreError> {
        let variable = lookup(&self.table, key)?;
        let mapping = variable.mapping(self.unit_system(key));

        Ok(self
            .selections
            .get(key)
            .and_then(|s| mapping.value_scores.get(s.option))
            .map(|v| v.label.as_str()))
    }

    /// Register a plotting collaborator. It is sent the current values
    /// immediately and again whenever they change.
    pub fn subscribe(&mut self, sink: Box<dyn PlotSink>) {
        sink.update(&self.last_update);
        self.sinks.push(sink);
    }

    pub fn plot_update(&self) -> Result<PlotUpdate, ScoreError> {
        Ok(match self.result()? {
            Some(result) => PlotUpdate {
                score: Some(result.score),
                band: Some(result.band),
                mortality: Some(result.mortality),
            },
            None => PlotUpdate::default(),
        })
    }

    /// Push the current values to sinks if they changed. A failed lookup
    /// is logged rather than returned, since the selection it follows has
    /// already been recorded.
    fn notify(&mut self) {
        let update = match self.plot_update() {
            Ok(update) => update,
            Err(e) => {
                tracing::error!(error = %e, "plot update unavailable");
                return;
            }
        };
        if update == self.last_update {
            return;
        }

        for sink in &self.sinks {
            sink.update(&update);
        }
        self.last_update = update;
    }
}

fn lookup<'a>(table: &'a ScoreTable, key: &str) -> Result<&'a VariableDefinition, ScoreError> {
    table
        .variable(key)
        .ok_or_else(|| ScoreError::UnknownVariable(key.to_string()))
}
