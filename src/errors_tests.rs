//! Unit tests for error handling
//!
//! Tests error types, conversions, and the codes reported to HTTP clients.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::AskRagError;

    // ====== Error Type Tests ======

    #[test]
    fn test_config_error() {
        let error = AskRagError::Config("Invalid configuration".to_string());
        assert!(matches!(error, AskRagError::Config(_)));
        let display = format!("{error}");
        assert!(display.contains("Invalid configuration"));
    }

    #[test]
    fn test_display_prefixes() {
        let cases = vec![
            (AskRagError::InvalidRequest("q".into()), "Invalid request"),
            (AskRagError::VectorStore("v".into()), "Vector store error"),
            (AskRagError::Embedding("e".into()), "Embedding backend error"),
            (AskRagError::Llm("l".into()), "Chat backend error"),
            (AskRagError::Telemetry("t".into()), "Telemetry error"),
        ];

        for (error, prefix) in cases {
            assert!(format!("{error}").starts_with(prefix), "{error}");
        }
    }

    // ====== Error Code Tests ======

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            AskRagError::InvalidRequest(String::new()).code(),
            "invalid_request"
        );
        assert_eq!(
            AskRagError::VectorStore(String::new()).code(),
            "vector_store_error"
        );
        assert_eq!(
            AskRagError::Embedding(String::new()).code(),
            "embedding_backend_error"
        );
        assert_eq!(AskRagError::Llm(String::new()).code(), "chat_backend_error");
        assert_eq!(AskRagError::Config(String::new()).code(), "internal_error");
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: AskRagError = io_err.into();

        match err {
            AskRagError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: Result<serde_json::Value, _> = serde_json::from_str("{invalid json}");

        let json_err = parse_result.unwrap_err();
        let err: AskRagError = json_err.into();
        assert!(matches!(err, AskRagError::Serialization(_)));
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn test_error_from_toml() {
        let parse_result: Result<toml::Value, _> = toml::from_str("this is = = not toml");

        let err: AskRagError = parse_result.unwrap_err().into();
        assert!(matches!(err, AskRagError::TomlParsing(_)));
    }

    // ====== Result Type Tests ======

    #[test]
    fn test_result_and_then() {
        let result: crate::Result<usize> = Ok(3);
        let chained = result.and_then(|v| {
            if v > 0 {
                Ok(v * 2)
            } else {
                Err(AskRagError::InvalidRequest("empty".to_string()))
            }
        });
        assert_eq!(chained.unwrap(), 6);
    }
}
