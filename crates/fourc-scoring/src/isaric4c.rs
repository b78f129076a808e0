//! The ISARIC 4C Mortality Score.
//!
//! Variable weights follow Table 2 of Knight et al., BMJ 2020;370:m3339
//! (doi:10.1136/bmj.m3339). The mortality curve and patient counts are the
//! validation-cohort observations behind Figure 2.

use crate::scoring::{RiskBand, UnitMapping, ValueScore, VariableDefinition};

/// Observed in-hospital mortality (%) at each total score 0..=21.
pub const MORTALITY: [f64; 22] = [
    0.0,
    0.2976190476190476,
    0.8064516129032258,
    2.3112480739599386,
    4.805194805194805,
    7.474226804123711,
    7.783783783783784,
    11.695376246600182,
    14.448669201520913,
    19.164619164619165,
    22.899946495452113,
    26.91561590688652,
    32.90793072014585,
    40.13188883655205,
    44.57494407158837,
    51.63934426229508,
    59.10313901345292,
    66.12244897959184,
    75.80993520518359,
    77.3913043478261,
    82.88288288288288,
    87.5,
];

/// Validation-cohort patients observed at each total score 0..=21.
pub const PATIENTS: [u32; 22] = [
    160, 329, 485, 645, 759, 759, 919, 1097, 1308, 1620, 1864, 2050, 2185, 2118, 1780, 1455, 1109,
    725, 455, 223, 101, 33,
];

const COMORBIDITIES_HELP: &str = "Chronic cardiac disease; chronic respiratory disease (excluding \
asthma); chronic renal disease (estimated glomerular filtration rate ≤30); mild-to-severe liver \
disease; dementia; chronic neurological conditions; connective tissue disease; diabetes mellitus \
(diet, tablet or insulin-controlled); HIV/AIDS; malignancy; clinician-defined obesity.";

fn mapping(display_name: &str, values: &[(&str, u32)]) -> UnitMapping {
    UnitMapping {
        display_name: display_name.to_string(),
        value_scores: values
            .iter()
            .map(|(label, points)| ValueScore {
                label: label.to_string(),
                points: *points,
            })
            .collect(),
    }
}

fn variable(key: &str, primary: UnitMapping) -> VariableDefinition {
    VariableDefinition {
        key: key.to_string(),
        primary,
        alternate: None,
        help: None,
    }
}

/// The eight scoring variables, in display order.
pub fn variables() -> Vec<VariableDefinition> {
    vec![
        variable(
            "age",
            mapping(
                "Age (years)",
                &[("18-49", 0), ("50-59", 2), ("60-69", 4), ("70-79", 6), ("⩾80", 7)],
            ),
        ),
        variable("sex", mapping("Sex at birth", &[("Female", 0), ("Male", 1)])),
        VariableDefinition {
            help: Some(COMORBIDITIES_HELP.to_string()),
            ..variable(
                "comorbidities",
                mapping("Number of comorbidities", &[("0", 0), ("1", 1), ("⩾2", 2)]),
            )
        },
        variable(
            "respiratory_rate",
            mapping(
                "Respiratory rate (breaths/minutes)",
                &[("<20", 0), ("20-29", 1), ("⩾30", 2)],
            ),
        ),
        variable(
            "oxygen_saturation",
            mapping(
                "Peripheral oxygen saturation on room air (%)",
                &[("<92", 2), ("⩾92", 0)],
            ),
        ),
        variable("gcs", mapping("Glasgow Coma Scale", &[("<15", 2), ("15", 0)])),
        VariableDefinition {
            alternate: Some(mapping(
                "BUN (mg/dL)",
                &[("<19.6", 0), ("19.6-39.2", 1), (">39.2", 3)],
            )),
            ..variable(
                "urea",
                mapping("Urea (mmol/L)", &[("<7", 0), ("7-14", 1), (">14", 3)]),
            )
        },
        VariableDefinition {
            alternate: Some(mapping(
                "CRP (mg/dL)",
                &[("<5", 0), ("5-9.9", 1), ("⩾10", 2)],
            )),
            ..variable(
                "crp",
                mapping("CRP (mg/L)", &[("<50", 0), ("50-99", 1), ("⩾100", 2)]),
            )
        },
    ]
}

/// Risk groups from the model validation.
pub fn bands() -> Vec<RiskBand> {
    [
        ("Low", 0, 3, "#fee5d9", 1.2),
        ("Intermediate", 4, 8, "#fcae91", 9.9),
        ("High", 9, 14, "#fb6a4a", 31.4),
        ("Very High", 15, 21, "#cb181d", 61.5),
    ]
    .into_iter()
    .map(|(name, min, max, color, mortality)| RiskBand {
        name: name.to_string(),
        min,
        max,
        color: color.to_string(),
        mortality,
    })
    .collect()
}
