//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;
    use crate::errors::AskRagError;

    // ====== Default Value Tests ======

    #[test]
    fn test_defaults_match_local_deployment() {
        let config = AppConfig::default();

        assert_eq!(config.llm.base_url, "http://localhost:1234/v1");
        assert_eq!(config.llm.model, "deepseek-r1-distill-qwen-7b");
        assert!(config.llm.temperature.abs() < f32::EPSILON);
        assert_eq!(
            config.embeddings.model,
            "text-embedding-nomic-embed-text-v1.5"
        );
        assert_eq!(config.vector_store.path, "../my_embeddings");
        assert_eq!(config.vector_store.backend, VectorBackend::Local);
        assert_eq!(config.top_k(), 4);
        assert!(config.session.max_history_messages.is_none());
        assert!(config.telemetry.console);
    }

    #[test]
    fn test_bind_addr() {
        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    // ====== TOML Parsing Tests ======

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [llm]
            model = "qwen2.5-7b-instruct"

            [vector_store]
            top_k = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "qwen2.5-7b-instruct");
        assert_eq!(config.llm.base_url, "http://localhost:1234/v1");
        assert_eq!(config.top_k(), 8);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_qdrant_backend_parses() {
        let config = AppConfig::from_toml_str(
            r#"
            [vector_store]
            backend = "qdrant"
            qdrant_url = "http://10.0.0.5:6333"
            collection = "handbook"
            "#,
        )
        .unwrap();

        assert_eq!(config.vector_store.backend, VectorBackend::Qdrant);
        assert_eq!(config.vector_store.collection, "handbook");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nmax_history_messages = 10").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.session.max_history_messages, Some(10));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = AppConfig::from_toml_str("[llm\nmodel = ");
        assert!(matches!(result, Err(AskRagError::TomlParsing(_))));
    }

    #[test]
    fn test_round_trip_through_rendered_toml() {
        let mut config = AppConfig::default();
        config.session.max_history_messages = Some(12);
        let rendered = config.to_toml_string().unwrap();

        let parsed = AppConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed.session.max_history_messages, Some(12));
        assert_eq!(parsed.llm.model, config.llm.model);
    }

    // ====== Validation Tests ======

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.vector_store.top_k = 0;
        assert!(matches!(config.validate(), Err(AskRagError::Config(_))));
    }

    #[test]
    fn test_history_bound_must_hold_whole_turns() {
        let mut config = AppConfig::default();
        for bad in [0, 1, 3, 7] {
            config.session.max_history_messages = Some(bad);
            assert!(
                matches!(config.validate(), Err(AskRagError::Config(_))),
                "bound {bad} accepted"
            );
        }

        for good in [2, 4, 20] {
            config.session.max_history_messages = Some(good);
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_bad_backend_url_rejected() {
        let mut config = AppConfig::default();
        config.llm.base_url = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("llm.base_url"));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = AppConfig::default();
        config.embeddings.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telemetry_endpoint_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.telemetry.enabled = false;
        config.telemetry.otlp_endpoint = "::".to_string();
        assert!(config.validate().is_ok());
    }

    // ====== Layered Loading Tests ======

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let result = AppConfig::load_from(Some(std::path::Path::new(
            "/definitely/not/here/askrag.toml",
        )));
        assert!(matches!(result, Err(AskRagError::Config(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[vector_store]\ntop_k = 2\ncollection = \"from-file\"").unwrap();

        let env = ::config::Map::from([(
            "ASKRAG__VECTOR_STORE__TOP_K".to_string(),
            "7".to_string(),
        )]);
        let config = AppConfig::load_layered(Some(file.path()), Some(env)).unwrap();

        assert_eq!(config.top_k(), 7);
        assert_eq!(config.vector_store.collection, "from-file");
    }
}
