//! Integration tests for config

#[cfg(test)]
mod tests {
    use mhlcheck_config::*;
    use mhlcheck_errors::{ConfigError, Error};
    use mhlcheck_types::{ColorChoice, HashType, OutputFormat, ToolExitCode};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[oracle]
strict_completeness = false
default_hash_types = ["md5", "xxhash64be"]

[exit_codes]
hash_mismatch = 42
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert!(!config.oracle.strict_completeness);
        assert!(config.oracle.case_insensitive_hashtype);
        assert_eq!(
            config.oracle.default_hash_types,
            vec![HashType::Md5, HashType::XxHash64Be]
        );
        assert_eq!(
            config.exit_codes.overrides(),
            vec![(ToolExitCode::HashMismatch, 42)]
        );
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/mhlcheck.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[general\ncolor = ").unwrap();
        let err = Config::load_or_default(Some(temp_file.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        // Clean up any existing env vars first
        std::env::remove_var("MHLCHECK_OUTPUT");
        std::env::remove_var("MHLCHECK_COLOR");
        std::env::remove_var("MHLCHECK_STRICT_COMPLETENESS");

        std::env::set_var("MHLCHECK_OUTPUT", "json");
        std::env::set_var("MHLCHECK_COLOR", "always");
        std::env::set_var("MHLCHECK_STRICT_COMPLETENESS", "no");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert!(!config.oracle.strict_completeness);

        // Clean up
        std::env::remove_var("MHLCHECK_OUTPUT");
        std::env::remove_var("MHLCHECK_COLOR");
        std::env::remove_var("MHLCHECK_STRICT_COMPLETENESS");
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        // Clean up any existing env vars first
        std::env::remove_var("MHLCHECK_OUTPUT");
        std::env::remove_var("MHLCHECK_COLOR");
        std::env::remove_var("MHLCHECK_STRICT_COMPLETENESS");

        std::env::set_var("MHLCHECK_STRICT_COMPLETENESS", "maybe");

        let mut config = Config::default();
        let err = config.merge_env().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "MHLCHECK_STRICT_COMPLETENESS"
        ));

        // Clean up
        std::env::remove_var("MHLCHECK_STRICT_COMPLETENESS");
    }
}
