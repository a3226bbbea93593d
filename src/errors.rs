use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskRagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Embedding backend error: {0}")]
    Embedding(String),

    #[error("Chat backend error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AskRagError {
    /// Stable machine-readable code reported to HTTP clients
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::VectorStore(_) => "vector_store_error",
            Self::Embedding(_) => "embedding_backend_error",
            Self::Llm(_) | Self::Http(_) => "chat_backend_error",
            Self::Config(_)
            | Self::Telemetry(_)
            | Self::Serialization(_)
            | Self::TomlParsing(_)
            | Self::ConfigLoad(_)
            | Self::Io(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, AskRagError>;
