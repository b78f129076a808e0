use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ScoreError};
use crate::isaric4c;
use crate::plot::PlotPoint;
use crate::scoring::{RiskBand, ScoreResult, UnitMapping, VariableDefinition};

/// Read-only catalog of scoring variables together with the mortality curve
/// and risk bands they map onto.
///
/// Construction checks that the variables, curve and bands agree on the
/// maximum score, so lookups in `[0, max_score]` cannot miss.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreTable {
    variables: Vec<VariableDefinition>,
    mortality: Vec<f64>,
    patients: Vec<u32>,
    bands: Vec<RiskBand>,
    #[serde(skip)]
    band_index: Vec<usize>,
    #[serde(skip)]
    max_score: u32,
}

/// On-disk shape of a score table.
#[derive(Debug, Deserialize)]
struct RawTable {
    variables: Vec<VariableDefinition>,
    mortality: Vec<f64>,
    patients: Vec<u32>,
    bands: Vec<RiskBand>,
}

impl ScoreTable {
    pub fn new(
        variables: Vec<VariableDefinition>,
        mortality: Vec<f64>,
        patients: Vec<u32>,
        bands: Vec<RiskBand>,
    ) -> Result<Self, CatalogError> {
        let mut errors = Vec::new();

        check_variables(&variables, &mut errors);
        let Some(max_score) = variables
            .iter()
            .try_fold(0u32, |total, v| total.checked_add(v.max_points()))
        else {
            errors.push("maximum points of all variables overflow a u32 score".to_string());
            tracing::error!(violations = errors.len(), "score table rejected");
            return Err(CatalogError::Integrity(errors));
        };
        let expected_len = max_score as usize + 1;

        let curve_matches = mortality.len() == expected_len;
        if !curve_matches {
            errors.push(format!(
                "mortality curve has {} entries, expected {expected_len} for max score {max_score}",
                mortality.len()
            ));
        }
        check_curve(&mortality, &mut errors);

        if patients.len() != expected_len {
            errors.push(format!(
                "patient counts have {} entries, expected {expected_len} for max score {max_score}",
                patients.len()
            ));
        }

        // The band index is sized by max_score, so only build it once the
        // curve has confirmed that size.
        let band_index = if curve_matches {
            expand_bands(&bands, max_score, &mut errors)
        } else {
            Vec::new()
        };

        if !errors.is_empty() {
            tracing::error!(violations = errors.len(), "score table rejected");
            return Err(CatalogError::Integrity(errors));
        }

        tracing::debug!(
            variables = variables.len(),
            bands = bands.len(),
            max_score,
            "score table loaded"
        );

        Ok(Self {
            variables,
            mortality,
            patients,
            bands,
            band_index,
            max_score,
        })
    }

    /// The built-in ISARIC 4C Mortality Score table.
    pub fn isaric_4c() -> Result<Self, CatalogError> {
        Self::new(
            isaric4c::variables(),
            isaric4c::MORTALITY.to_vec(),
            isaric4c::PATIENTS.to_vec(),
            isaric4c::bands(),
        )
    }

    /// Load a table from JSON with `variables`, `mortality`, `patients` and
    /// `bands` fields, the same shape this type serializes to.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawTable = serde_json::from_str(json)?;
        Self::new(raw.variables, raw.mortality, raw.patients, raw.bands)
    }

    /// Variables in display order.
    pub fn list_variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    pub fn variable(&self, key: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn bands(&self) -> &[RiskBand] {
        &self.bands
    }

    pub fn mortality_curve(&self) -> &[f64] {
        &self.mortality
    }

    pub fn band_for_score(&self, score: u32) -> Result<&RiskBand, ScoreError> {
        let slot = self.slot(score)?;
        Ok(&self.bands[self.band_index[slot]])
    }

    pub fn mortality_for_score(&self, score: u32) -> Result<f64, ScoreError> {
        Ok(self.mortality[self.slot(score)?])
    }

    pub fn patients_for_score(&self, score: u32) -> Result<u32, ScoreError> {
        Ok(self.patients[self.slot(score)?])
    }

    pub fn result(&self, score: u32) -> Result<ScoreResult, ScoreError> {
        Ok(ScoreResult {
            score,
            band: self.band_for_score(score)?.clone(),
            mortality: self.mortality_for_score(score)?,
        })
    }

    /// Per-score series for the combined risk plot.
    pub fn plot_series(&self) -> Vec<PlotPoint> {
        (0..=self.max_score)
            .zip(&self.mortality)
            .zip(&self.patients)
            .zip(&self.band_index)
            .map(|(((score, mortality), patients), band)| PlotPoint {
                score,
                patients: *patients,
                mortality: *mortality,
                color: self.bands[*band].color.clone(),
            })
            .collect()
    }

    fn slot(&self, score: u32) -> Result<usize, ScoreError> {
        if score > self.max_score {
            return Err(ScoreError::OutOfRange {
                score,
                max: self.max_score,
            });
        }
        Ok(score as usize)
    }
}

fn check_variables(variables: &[VariableDefinition], errors: &mut Vec<String>) {
    if variables.is_empty() {
        errors.push("no variables defined".to_string());
    }

    let mut keys = HashSet::new();
    for variable in variables {
        if !keys.insert(variable.key.as_str()) {
            errors.push(format!("duplicate variable key '{}'", variable.key));
        }
        check_mapping(&variable.key, &variable.primary, errors);

        let Some(alternate) = &variable.alternate else {
            continue;
        };
        check_mapping(&variable.key, alternate, errors);

        let primary_points = points(&variable.primary);
        let alternate_points = points(alternate);
        if primary_points != alternate_points {
            errors.push(format!(
                "{}: alternate units '{}' score {alternate_points:?}, \
                 primary units '{}' score {primary_points:?}",
                variable.key, alternate.display_name, variable.primary.display_name,
            ));
        }
    }
}

fn points(mapping: &UnitMapping) -> Vec<u32> {
    mapping.value_scores.iter().map(|v| v.points).collect()
}

fn check_mapping(key: &str, mapping: &UnitMapping, errors: &mut Vec<String>) {
    if mapping.value_scores.is_empty() {
        errors.push(format!("{key}: '{}' has no values", mapping.display_name));
    }

    let mut labels = HashSet::new();
    for value in &mapping.value_scores {
        if !labels.insert(value.label.as_str()) {
            errors.push(format!(
                "{key}: '{}' lists value '{}' twice",
                mapping.display_name, value.label
            ));
        }
    }
}

fn check_curve(mortality: &[f64], errors: &mut Vec<String>) {
    for (score, value) in mortality.iter().enumerate() {
        if !value.is_finite() || !(0.0..=100.0).contains(value) {
            errors.push(format!("mortality at score {score} is not a percentage: {value}"));
        }
    }
    for (score, pair) in mortality.windows(2).enumerate() {
        if pair[1] < pair[0] {
            errors.push(format!(
                "mortality decreases from score {score} ({}) to {} ({})",
                pair[0],
                score + 1,
                pair[1]
            ));
        }
    }
}

/// Expand each band's `[min, max]` into a direct score -> band index,
/// recording gaps and overlaps.
fn expand_bands(bands: &[RiskBand], max_score: u32, errors: &mut Vec<String>) -> Vec<usize> {
    let mut slots: Vec<Option<usize>> = vec![None; max_score as usize + 1];

    for (i, band) in bands.iter().enumerate() {
        if band.min > band.max {
            errors.push(format!(
                "band '{}' has min {} above max {}",
                band.name, band.min, band.max
            ));
            continue;
        }
        for score in band.min..=band.max {
            match slots.get_mut(score as usize) {
                None => {
                    errors.push(format!(
                        "band '{}' extends to {} beyond max score {max_score}",
                        band.name, band.max
                    ));
                    break;
                }
                Some(Some(previous)) => errors.push(format!(
                    "score {score} is in both '{}' and '{}'",
                    bands[*previous].name, band.name
                )),
                Some(slot) => *slot = Some(i),
            }
        }
    }

    let mut index = Vec::with_capacity(slots.len());
    for (score, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(band) => index.push(band),
            None => errors.push(format!("score {score} is not covered by any band")),
        }
    }
    index
}
