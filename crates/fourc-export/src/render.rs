use serde::Serialize;
use tera::{Context, Tera};

use fourc_scoring::{ScoreTable, Session};

use crate::error::ExportError;
use crate::templates;

#[derive(Serialize)]
struct ValueRow<'a> {
    label: &'a str,
    points: u32,
}

#[derive(Serialize)]
struct VariableRows<'a> {
    name: &'a str,
    help: Option<&'a str>,
    values: Vec<ValueRow<'a>>,
}

#[derive(Serialize)]
struct MortalityRow {
    score: u32,
    mortality: String,
}

#[derive(Serialize)]
struct Explanation<'a> {
    variables: Vec<VariableRows<'a>>,
    mortality: Vec<MortalityRow>,
}

#[derive(Serialize)]
struct SummaryResult<'a> {
    score: u32,
    band: &'a str,
    min: u32,
    max: u32,
    mortality: String,
}

#[derive(Serialize)]
struct Summary<'a> {
    result: Option<SummaryResult<'a>>,
    max_score: u32,
    answered: usize,
    total: usize,
}

/// Render a Tera template against any serializable context.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    context: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(context)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    tracing::debug!(template = template_name, bytes = rendered.len(), "template rendered");
    Ok(rendered)
}

/// Per-variable contribution tables followed by the score -> mortality
/// lookup table (scores 1 and up, mortality to one decimal place).
pub fn render_explanation(table: &ScoreTable) -> Result<String, ExportError> {
    let variables = table
        .list_variables()
        .iter()
        .map(|variable| VariableRows {
            name: variable.display_name(),
            help: variable.help.as_deref(),
            values: variable
                .primary
                .value_scores
                .iter()
                .map(|v| ValueRow {
                    label: &v.label,
                    points: v.points,
                })
                .collect(),
        })
        .collect();

    let mortality = (1..=table.max_score())
        .map(|score| -> Result<MortalityRow, ExportError> {
            Ok(MortalityRow {
                score,
                mortality: percent(table.mortality_for_score(score)?),
            })
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    render_template(
        templates::EXPLANATION_NAME,
        templates::EXPLANATION,
        &Explanation {
            variables,
            mortality,
        },
    )
}

/// The score, risk group and mortality for a complete session, or a prompt
/// to finish answering.
pub fn render_summary(session: &Session) -> Result<String, ExportError> {
    let result = session.result()?;
    let result = result.as_ref().map(|r| SummaryResult {
        score: r.score,
        band: &r.band.name,
        min: r.band.min,
        max: r.band.max,
        mortality: percent(r.mortality),
    });

    render_template(
        templates::SUMMARY_NAME,
        templates::SUMMARY,
        &Summary {
            result,
            max_score: session.table().max_score(),
            answered: session.answered(),
            total: session.table().list_variables().len(),
        },
    )
}

/// Percentage rounded to one decimal place.
pub fn percent(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}
