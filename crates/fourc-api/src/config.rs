use std::net::SocketAddr;
use std::path::PathBuf;

use jiff::SignedDuration;

use fourc_scoring::ScoreTable;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// Structured JSON, one event per line.
    Json,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// JSON score table to serve instead of the built-in 4C table.
    pub score_table: Option<PathBuf>,
    pub log_format: LogFormat,
    /// How long a session may sit unused before it is dropped.
    pub session_ttl: SignedDuration,
}

impl ApiConfig {
    /// Read `FOURC_BIND_ADDR`, `FOURC_SCORE_TABLE`, `FOURC_LOG_FORMAT` and
    /// `FOURC_SESSION_TTL_SECS`.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let bind_addr = lookup("FOURC_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| eyre::eyre!("invalid FOURC_BIND_ADDR '{bind_addr}': {e}"))?;

        let log_format = match lookup("FOURC_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(eyre::eyre!(
                    "invalid FOURC_LOG_FORMAT '{other}', expected 'pretty' or 'json'"
                ));
            }
        };

        let session_ttl = match lookup("FOURC_SESSION_TTL_SECS") {
            None => DEFAULT_SESSION_TTL_SECS,
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(eyre::eyre!(
                        "invalid FOURC_SESSION_TTL_SECS '{raw}', expected a positive number of seconds"
                    ));
                }
            },
        };

        Ok(Self {
            bind_addr,
            score_table: lookup("FOURC_SCORE_TABLE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_format,
            session_ttl: SignedDuration::from_secs(session_ttl),
        })
    }

    /// Load the configured score table, checking its integrity once up front.
    pub fn load_table(&self) -> eyre::Result<ScoreTable> {
        let Some(path) = &self.score_table else {
            tracing::info!("using built-in 4C score table");
            return Ok(ScoreTable::isaric_4c()?);
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read score table at {}: {e}", path.display()))?;
        let table = ScoreTable::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            max_score = table.max_score(),
            "score table loaded"
        );
        Ok(table)
    }
}
