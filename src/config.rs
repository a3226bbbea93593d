use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::errors::AskRagError;

/// Environment variable holding the OTLP/HTTP collector address
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_HTTP_ENDPOINT";

/// Environment variable that overrides both backend API keys
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Prefix for layered environment overrides, e.g. `ASKRAG__LLM__MODEL`
pub const ENV_PREFIX: &str = "ASKRAG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_true")]
    pub file_output: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: default_log_dir(),
            file_output: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    /// Remove `<think>` blocks emitted by reasoning models from replies
    #[serde(default)]
    pub strip_reasoning: bool,
}

fn default_backend_url() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_llm_model() -> String {
    "deepseek-r1-distill-qwen-7b".to_string()
}

fn default_api_key() -> String {
    "not-needed".to_string()
}

const fn default_llm_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            model: default_llm_model(),
            temperature: 0.0,
            api_key: default_api_key(),
            max_tokens: None,
            timeout_secs: default_llm_timeout(),
            strip_reasoning: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-nomic-embed-text-v1.5".to_string()
}

const fn default_embedding_timeout() -> u64 {
    60
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            model: default_embedding_model(),
            api_key: default_api_key(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// Collection file persisted on local disk
    Local,
    /// Qdrant server reached over HTTP
    Qdrant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_vector_backend")]
    pub backend: VectorBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_vector_backend() -> VectorBackend {
    VectorBackend::Local
}

fn default_store_path() -> String {
    "../my_embeddings".to_string()
}

fn default_collection() -> String {
    "langchain".to_string()
}

fn default_qdrant_url() -> String {
    "http://127.0.0.1:6333".to_string()
}

const fn default_top_k() -> usize {
    4
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: default_vector_backend(),
            path: default_store_path(),
            collection: default_collection(),
            qdrant_url: default_qdrant_url(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session used when a request names none
    #[serde(default = "default_session_id")]
    pub default_session_id: String,
    /// Request header carrying the session key
    #[serde(default = "default_session_header")]
    pub header: String,
    /// Upper bound on stored messages per session, an even number since
    /// turns are kept in question/answer pairs; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history_messages: Option<usize>,
}

fn default_session_id() -> String {
    "default".to_string()
}

fn default_session_header() -> String {
    "x-session-id".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_session_id: default_session_id(),
            header: default_session_header(),
            max_history_messages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    /// Mirror exported spans to stdout
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_otlp_endpoint() -> String {
    std::env::var(OTLP_ENDPOINT_ENV).unwrap_or_else(|_| "http://127.0.0.1:4318".to_string())
}

fn default_service_name() -> String {
    "askrag".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            otlp_endpoint: default_otlp_endpoint(),
            console: true,
            service_name: default_service_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, without environment layering
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default file locations layered with
    /// `ASKRAG__*` environment overrides
    pub fn load() -> crate::Result<Self> {
        // Try config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::load_from(Some(Path::new("config.toml")))
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::load_from(Some(Path::new("config.example.toml")))
        } else {
            Self::load_from(None)
        }
    }

    /// Load configuration from an explicit file (if any) layered with
    /// environment overrides
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        Self::load_layered(path, None)
    }

    /// Layered load reading `ASKRAG__*` keys from `env` instead of the
    /// process environment when given
    pub(crate) fn load_layered(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> crate::Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(AskRagError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(::config::File::from(path));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply the well-known environment variables shared with other
    /// OpenAI/OpenTelemetry tooling
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(OTLP_ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.telemetry.otlp_endpoint = endpoint;
            }
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.llm.api_key.clone_from(&key);
                self.embeddings.api_key = key;
            }
        }
    }

    /// Reject configurations that cannot produce a working service
    pub fn validate(&self) -> crate::Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(AskRagError::Config("llm.model must not be empty".into()));
        }
        if self.embeddings.model.trim().is_empty() {
            return Err(AskRagError::Config(
                "embeddings.model must not be empty".into(),
            ));
        }
        check_url("llm.base_url", &self.llm.base_url)?;
        check_url("embeddings.base_url", &self.embeddings.base_url)?;
        if self.vector_store.backend == VectorBackend::Qdrant {
            check_url("vector_store.qdrant_url", &self.vector_store.qdrant_url)?;
        }
        if self.telemetry.enabled {
            check_url("telemetry.otlp_endpoint", &self.telemetry.otlp_endpoint)?;
        }
        if self.vector_store.top_k == 0 {
            return Err(AskRagError::Config(
                "vector_store.top_k must be at least 1".into(),
            ));
        }
        if let Some(max) = self.session.max_history_messages {
            if max < 2 || max % 2 != 0 {
                return Err(AskRagError::Config(format!(
                    "session.max_history_messages must be an even number of at least 2, got {max}"
                )));
            }
        }
        if self.session.default_session_id.trim().is_empty() {
            return Err(AskRagError::Config(
                "session.default_session_id must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AskRagError::Config(format!("failed to render configuration: {e}")))
    }

    /// Get the socket address the API server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get number of documents retrieved per question
    pub fn top_k(&self) -> usize {
        self.vector_store.top_k
    }
}

fn check_url(field: &str, value: &str) -> crate::Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| AskRagError::Config(format!("{field} is not a valid URL ({value}): {e}")))
}
