use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which of a variable's unit mappings is currently displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UnitSystem {
    #[default]
    Primary,
    Alternate,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Primary => UnitSystem::Alternate,
            UnitSystem::Alternate => UnitSystem::Primary,
        }
    }
}

/// A selectable value label and the points it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValueScore {
    pub label: String,
    pub points: u32,
}

/// A named set of value labels in one unit system, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UnitMapping {
    pub display_name: String,
    pub value_scores: Vec<ValueScore>,
}

impl UnitMapping {
    /// Position of `label` in this mapping. The position is shared across
    /// unit systems and identifies the value independently of its label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.value_scores.iter().position(|v| v.label == label)
    }

    pub fn max_points(&self) -> u32 {
        self.value_scores.iter().map(|v| v.points).max().unwrap_or(0)
    }
}

/// One scoring variable of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariableDefinition {
    pub key: String,
    pub primary: UnitMapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<UnitMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl VariableDefinition {
    pub fn display_name(&self) -> &str {
        &self.primary.display_name
    }

    /// The mapping shown for `units`. Falls back to the primary mapping when
    /// the variable has no alternate.
    pub fn mapping(&self, units: UnitSystem) -> &UnitMapping {
        match (units, &self.alternate) {
            (UnitSystem::Alternate, Some(alternate)) => alternate,
            _ => &self.primary,
        }
    }

    pub fn has_alternate(&self) -> bool {
        self.alternate.is_some()
    }

    pub fn max_points(&self) -> u32 {
        self.primary.max_points()
    }
}

/// A named, colored range of total scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskBand {
    pub name: String,
    pub min: u32,
    pub max: u32,
    /// Hex color used when drawing scores in this band.
    pub color: String,
    /// Representative observed mortality for the band, in percent.
    pub mortality: f64,
}

impl RiskBand {
    pub fn contains(&self, score: u32) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

/// A total score over a fully answered session.
///
/// Only a complete [`Session`](crate::session::Session) hands these out, so
/// holding one proves every variable was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, TS)]
#[ts(export)]
pub struct TotalScore(u32);

impl TotalScore {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TotalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category and observed mortality for a total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreResult {
    pub score: u32,
    pub band: RiskBand,
    /// Observed in-hospital mortality at this score, in percent.
    pub mortality: f64,
}
