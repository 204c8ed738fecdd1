use crate::error::{AgentError, Result};
use civic_forms::PollPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG: &str = "CIVIC_CONFIG";
pub const ENV_BACKEND: &str = "CIVIC_BACKEND";
pub const ENV_STORE_PATH: &str = "CIVIC_STORE_PATH";
pub const ENV_TABLE: &str = "DDB_TABLE";
pub const ENV_DDB_ENDPOINT: &str = "CIVIC_DDB_ENDPOINT";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_INGEST_BUCKET: &str = "FORMS_INGEST_BUCKET";
pub const ENV_ANALYZER: &str = "CIVIC_ANALYZER";
pub const ENV_ANALYSIS_DIR: &str = "CIVIC_ANALYSIS_DIR";
pub const ENV_POLL_INTERVAL_MS: &str = "CIVIC_POLL_INTERVAL_MS";
pub const ENV_POLL_MAX_ATTEMPTS: &str = "CIVIC_POLL_MAX_ATTEMPTS";
pub const ENV_POLL_DEADLINE_MS: &str = "CIVIC_POLL_DEADLINE_MS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    File,
    Dynamodb,
}

impl Backend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Backend::Memory),
            "file" => Some(Backend::File),
            "dynamodb" | "ddb" => Some(Backend::Dynamodb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    #[default]
    Local,
    Textract,
}

impl AnalyzerKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Some(AnalyzerKind::Local),
            "textract" => Some(AnalyzerKind::Textract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// JSON file for the `file` backend
    pub path: Option<PathBuf>,
    /// DynamoDB table for the `dynamodb` backend
    pub table: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
    pub deadline_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
            deadline_ms: policy.deadline.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Bucket holding uploaded blank forms
    pub ingest_bucket: Option<String>,
    pub analyzer: AnalyzerKind,
    /// Saved analysis results for the `local` analyzer
    pub analysis_dir: Option<PathBuf>,
    pub poll: PollConfig,
}

/// Runtime configuration: optional TOML file, then environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub store: StoreConfig,
    pub forms: FormsConfig,
}

impl AgentConfig {
    /// Load from `path` (or `CIVIC_CONFIG`), apply the process environment and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(from_env);

        let mut config = match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from `lookup`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = get(ENV_BACKEND) {
            match Backend::parse(&raw) {
                Some(backend) => self.store.backend = backend,
                None => log::warn!("Ignoring unknown {ENV_BACKEND}={raw}"),
            }
        }
        if let Some(path) = get(ENV_STORE_PATH) {
            self.store.path = Some(PathBuf::from(path));
        }
        if let Some(table) = get(ENV_TABLE) {
            self.store.table = Some(table);
        }
        if let Some(endpoint) = get(ENV_DDB_ENDPOINT) {
            self.store.endpoint = Some(endpoint);
        }
        if let Some(region) = get(ENV_REGION) {
            self.store.region = Some(region);
        }
        if let Some(bucket) = get(ENV_INGEST_BUCKET) {
            self.forms.ingest_bucket = Some(bucket);
        }
        if let Some(raw) = get(ENV_ANALYZER) {
            match AnalyzerKind::parse(&raw) {
                Some(kind) => self.forms.analyzer = kind,
                None => log::warn!("Ignoring unknown {ENV_ANALYZER}={raw}"),
            }
        }
        if let Some(dir) = get(ENV_ANALYSIS_DIR) {
            self.forms.analysis_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = get(ENV_POLL_INTERVAL_MS).and_then(|v| parse_number::<u64>(ENV_POLL_INTERVAL_MS, &v)) {
            self.forms.poll.interval_ms = value;
        }
        if let Some(value) = get(ENV_POLL_MAX_ATTEMPTS).and_then(|v| parse_number::<u32>(ENV_POLL_MAX_ATTEMPTS, &v)) {
            self.forms.poll.max_attempts = value;
        }
        if let Some(value) = get(ENV_POLL_DEADLINE_MS).and_then(|v| parse_number::<u64>(ENV_POLL_DEADLINE_MS, &v)) {
            self.forms.poll.deadline_ms = value;
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.store.backend {
            Backend::Memory => {}
            Backend::File => {
                if self.store.path.is_none() {
                    return Err(AgentError::invalid_config(format!(
                        "the file backend needs store.path or {ENV_STORE_PATH}"
                    )));
                }
            }
            Backend::Dynamodb => {
                if self.store.table.as_deref().map_or(true, str::is_empty) {
                    return Err(AgentError::invalid_config(format!(
                        "the dynamodb backend needs store.table or {ENV_TABLE}"
                    )));
                }
            }
        }

        let poll = &self.forms.poll;
        if poll.interval_ms == 0 || poll.max_attempts == 0 || poll.deadline_ms == 0 {
            return Err(AgentError::invalid_config(
                "poll interval, attempts and deadline must all be positive",
            ));
        }
        if poll.deadline_ms < poll.interval_ms {
            return Err(AgentError::invalid_config(
                "poll deadline must be at least one interval",
            ));
        }
        Ok(())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.forms.poll.interval_ms),
            max_attempts: self.forms.poll.max_attempts,
            deadline: Duration::from_millis(self.forms.poll.deadline_ms),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring non-numeric {key}={raw}");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_memory_and_local_with_bounded_poll() {
        let config = AgentConfig::default();
        assert_eq!(config.store.backend, Backend::Memory);
        assert_eq!(config.forms.analyzer, AnalyzerKind::Local);
        assert_eq!(config.poll_policy(), PollPolicy::default());
        config.validate().unwrap();
    }

    #[test]
    fn toml_then_environment() {
        let mut config = AgentConfig::from_toml(
            r#"
            [store]
            backend = "file"
            path = "/tmp/civic.json"

            [forms]
            ingest_bucket = "from-file"

            [forms.poll]
            interval_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.forms.poll.interval_ms, 500);
        assert_eq!(config.forms.poll.max_attempts, 150);

        config.apply_env(env(&[
            (ENV_BACKEND, "dynamodb"),
            (ENV_TABLE, "civic-table"),
            (ENV_INGEST_BUCKET, "from-env"),
            (ENV_POLL_MAX_ATTEMPTS, "7"),
            (ENV_ANALYZER, " "),
        ]));

        assert_eq!(config.store.backend, Backend::Dynamodb);
        assert_eq!(config.store.table.as_deref(), Some("civic-table"));
        assert_eq!(config.forms.ingest_bucket.as_deref(), Some("from-env"));
        assert_eq!(config.forms.poll.max_attempts, 7);
        assert_eq!(config.forms.analyzer, AnalyzerKind::Local);
        config.validate().unwrap();
    }

    #[test]
    fn validation_rejects_incomplete_backends_and_zero_bounds() {
        let mut config = AgentConfig::default();
        config.store.backend = Backend::File;
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));

        config.store.backend = Backend::Dynamodb;
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.apply_env(env(&[(ENV_POLL_MAX_ATTEMPTS, "0")]));
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.apply_env(env(&[(ENV_POLL_DEADLINE_MS, "not-a-number")]));
        assert_eq!(config.forms.poll, PollConfig::default());
    }
}
