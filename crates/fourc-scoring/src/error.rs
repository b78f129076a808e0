use thiserror::Error;

/// Errors raised by lookups against the score table and by session updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unknown value '{label}' for variable '{variable}'")]
    UnknownValue { variable: String, label: String },

    #[error("score {score} is outside the table range [0, {max}]")]
    OutOfRange { score: u32, max: u32 },

    #[error("variable '{0}' has no alternate units")]
    NoAlternateUnits(String),
}

/// Errors raised while loading a score table.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("score table failed integrity check: {}", .0.join("; "))]
    Integrity(Vec<String>),

    #[error("score table could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
