//! Built-in Markdown templates (Tera/Jinja2 syntax).

pub const EXPLANATION_NAME: &str = "explanation.md";

pub const EXPLANATION: &str = r#"## How this calculation is done

The calculation is simple, and can be done without even requiring a calculator.

The 4C Mortality Score is obtained by adding the scores for each individual variable (see Table 2 of https://doi.org/10.1136/bmj.m3339). The contributions to the total score are:
{% for variable in variables %}
| {{ variable.name }} | Score |
|---|---|
{% for value in variable.values -%}
| {{ value.label }} | +{{ value.points }} |
{% endfor -%}
{% if variable.help %}
{{ variable.help }}
{% endif -%}
{% endfor %}
The observed in-hospital mortality for patients with this score in the validation cohort is then given by a lookup table (see Figure 2 of https://doi.org/10.1136/bmj.m3339):

| 4C Mortality Score | Mortality/% |
|---|---|
{% for row in mortality -%}
| {{ row.score }} | {{ row.mortality }} |
{% endfor -%}
"#;

pub const SUMMARY_NAME: &str = "summary.md";

pub const SUMMARY: &str = r#"{% if result -%}
**{{ result.score }}/{{ max_score }}** (higher is worse)

Risk group: {{ result.band }} (scores {{ result.min }}-{{ result.max }})

Observed in-hospital mortality: {{ result.mortality }}%
{% else -%}
**Please select a value for every variable to calculate a mortality score.** ({{ answered }} of {{ total }} answered)
{% endif -%}
"#;
