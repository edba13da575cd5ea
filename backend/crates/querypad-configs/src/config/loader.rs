use super::types::ServerConfig;
use std::fs;
use std::path::Path;

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_FORMATS: [&str; 2] = ["compact", "json"];

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// Note: Environment overrides are applied separately via `apply_env_overrides()`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment.
    ///
    /// - `QUERYPAD_SERVER_HOST`
    /// - `QUERYPAD_SERVER_PORT` (falls back to `PORT`)
    /// - `QUERYPAD_LOG_LEVEL`
    /// - `QUERYPAD_LOGS_PATH`
    /// - `GEMINI_API_KEY`
    /// - `QUERYPAD_GEMINI_MODEL`
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::apply_env_overrides`], reading from `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("QUERYPAD_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port_str) = lookup("QUERYPAD_SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid server port value: {}", port_str))?;
        }

        if let Some(level) = lookup("QUERYPAD_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Some(path) = lookup("QUERYPAD_LOGS_PATH") {
            self.logging.logs_path = path;
        }

        if let Some(key) = lookup("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.generation.api_key = Some(key);
            }
        }

        if let Some(model) = lookup("QUERYPAD_GEMINI_MODEL") {
            self.generation.model = model;
        }

        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            ));
        }

        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LEVELS.join(", ")
                ));
            }
        }

        if self.security.max_request_body_size == 0 {
            return Err(anyhow::anyhow!("max_request_body_size cannot be 0"));
        }

        if self.generation.timeout_secs == 0 {
            return Err(anyhow::anyhow!("generation.timeout_secs cannot be 0"));
        }

        if self.generation.model.trim().is_empty() {
            return Err(anyhow::anyhow!("generation.model cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
        assert!(config.dataset.seed);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_target_level() {
        let mut config = ServerConfig::default();
        config.logging.targets.insert("sql::exec".to_string(), "loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[logging]
level = "debug"

[logging.targets]
"sql::exec" = "trace"

[dataset]
seed = false
"#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.targets.get("sql::exec").map(String::as_str), Some("trace"));
        assert!(!config.dataset.seed);
        assert_eq!(config.generation.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides_from(lookup_from(&[
                ("QUERYPAD_SERVER_HOST", "0.0.0.0"),
                ("PORT", "4000"),
                ("QUERYPAD_LOG_LEVEL", "WARN"),
                ("GEMINI_API_KEY", "secret"),
            ]))
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.generation.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_named_port_wins_over_legacy_port() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides_from(lookup_from(&[("QUERYPAD_SERVER_PORT", "5000"), ("PORT", "4000")]))
            .unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides_from(lookup_from(&[("QUERYPAD_SERVER_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid server port value"));
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let mut config = ServerConfig::default();
        config.generation.api_key = Some("super-secret".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
    }
}
