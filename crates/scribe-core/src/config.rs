use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ScribeError};
use crate::types::BackendId;

/// Top-level configuration for the Scribe router.
///
/// Loaded from `~/.scribe/config.toml` by default. Every section falls back to
/// its defaults, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl ScribeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScribeConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the router cannot run with.
    pub fn validate(&self) -> Result<()> {
        for id in BackendId::ALL {
            if self.backends.get(id).url.trim().is_empty() {
                return Err(ScribeError::Config(format!("backends.{}.url is empty", id)));
            }
        }
        if self.backends.timeout_secs == 0 {
            return Err(ScribeError::Config(
                "backends.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.retrieval.top_n == 0 {
            return Err(ScribeError::Config(
                "retrieval.top_n must be at least 1".to_string(),
            ));
        }
        if self.retrieval.timeout_secs == 0 {
            return Err(ScribeError::Config(
                "retrieval.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.router.max_message_chars == 0 {
            return Err(ScribeError::Config(
                "router.max_message_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Interface the HTTP server binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// HTTP server middleware settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec!["http://localhost:3000".to_string()],
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// One backend service: a label for logs plus its invocation URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Human-readable label, usually the model name.
    pub name: String,
    /// Full URL the request body is POSTed to.
    pub url: String,
}

impl BackendConfig {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// The fixed set of backend services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    pub classifier: BackendConfig,
    pub citation: BackendConfig,
    pub structure: BackendConfig,
    pub grammar: BackendConfig,
    /// Total request timeout per backend call, in seconds.
    pub timeout_secs: u64,
    /// TCP connect timeout per backend call, in seconds.
    pub connect_timeout_secs: u64,
}

impl BackendsConfig {
    pub fn get(&self, id: BackendId) -> &BackendConfig {
        match id {
            BackendId::Classifier => &self.classifier,
            BackendId::Citation => &self.citation,
            BackendId::Structure => &self.structure,
            BackendId::Grammar => &self.grammar,
        }
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            classifier: BackendConfig::new("llama", "http://llama_api:8000/process/"),
            citation: BackendConfig::new("zephyr", "http://zephyr_api:8000/process/"),
            structure: BackendConfig::new("mistral", "http://mistral_api:8000/process/"),
            grammar: BackendConfig::new("bloom", "http://bloom_api:8000/process/"),
            timeout_secs: 60,
            connect_timeout_secs: 5,
        }
    }
}

/// Context retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// When false, dispatches never carry context.
    pub enabled: bool,
    /// Similarity store: "memory" or "chroma".
    pub store: String,
    /// Embedding source: "mock" or "http".
    pub embedding: String,
    /// Endpoint of the HTTP embedding service.
    pub embedding_url: String,
    /// Base URL of the Chroma server.
    pub chroma_url: String,
    /// Chroma collection name.
    pub collection: String,
    /// Passages file loaded into the in-memory store at startup.
    pub passages_file: Option<String>,
    /// Number of passages retrieved per query.
    pub top_n: usize,
    /// Timeout for one retrieval, in seconds.
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            store: "memory".to_string(),
            embedding: "mock".to_string(),
            embedding_url: "http://embedding_api:8000/embed/".to_string(),
            chroma_url: "http://localhost:8000".to_string(),
            collection: "dhbw_rules".to_string(),
            passages_file: None,
            top_n: 5,
            timeout_secs: 10,
        }
    }
}

/// Request router settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Longest accepted message, counted in characters after sanitization.
    pub max_message_chars: usize,
    /// Characters stripped from every incoming message.
    pub forbidden_chars: String,
    /// Session used when the client does not supply one.
    pub default_session: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 4000,
            forbidden_chars: "\"'".to_string(),
            default_session: "default".to_string(),
        }
    }
}

/// Keyword sets for the fallback classifier (case-insensitive substrings).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub citation: Vec<String>,
    pub structure: Vec<String>,
    pub grammar: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            citation: owned(&["zitat", "zitiere"]),
            structure: owned(&["struktur", "glieder", "strucktur", "glider"]),
            grammar: owned(&["verbesser", "überprüf", "schön"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ScribeConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.port, 8080);
        assert_eq!(config.backends.classifier.name, "llama");
        assert_eq!(config.backends.citation.url, "http://zephyr_api:8000/process/");
        assert_eq!(config.backends.timeout_secs, 60);
        assert_eq!(config.retrieval.top_n, 5);
        assert_eq!(config.retrieval.collection, "dhbw_rules");
        assert!(config.retrieval.passages_file.is_none());
        assert_eq!(config.router.forbidden_chars, "\"'");
        assert_eq!(config.router.default_session, "default");
        assert_eq!(config.keywords.citation, vec!["zitat", "zitiere"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backends_get_covers_every_id() {
        let backends = BackendsConfig::default();
        assert_eq!(backends.get(BackendId::Classifier).name, "llama");
        assert_eq!(backends.get(BackendId::Citation).name, "zephyr");
        assert_eq!(backends.get(BackendId::Structure).name, "mistral");
        assert_eq!(backends.get(BackendId::Grammar).name, "bloom");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
host = "0.0.0.0"
port = 9000

[backends]
timeout_secs = 30

[backends.structure]
name = "mixtral"
url = "http://localhost:9101/process/"

[retrieval]
store = "chroma"
top_n = 3

[keywords]
grammar = ["korrigier"]
"#;
        let file = create_temp_config(content);
        let config = ScribeConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.host, "0.0.0.0");
        assert_eq!(config.general.port, 9000);
        assert_eq!(config.backends.timeout_secs, 30);
        assert_eq!(config.backends.structure.name, "mixtral");
        // Untouched backends keep their defaults.
        assert_eq!(config.backends.grammar.name, "bloom");
        assert_eq!(config.retrieval.store, "chroma");
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.keywords.grammar, vec!["korrigier"]);
        assert_eq!(config.keywords.citation, vec!["zitat", "zitiere"]);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[router]\nmax_message_chars = 100\n");
        let config = ScribeConfig::load(file.path()).unwrap();
        assert_eq!(config.router.max_message_chars, 100);
        assert_eq!(config.router.default_session, "default");
        assert_eq!(config.general.port, 8080);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = ScribeConfig::load(file.path()).unwrap();
        assert_eq!(config.general.port, 8080);
        assert_eq!(config.retrieval.top_n, 5);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = ScribeConfig::load(file.path());
        assert!(matches!(result, Err(ScribeError::Config(_))));
    }

    #[test]
    fn test_load_rejects_zero_top_n() {
        let file = create_temp_config("[retrieval]\ntop_n = 0\n");
        let err = ScribeConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_validate_rejects_empty_backend_url() {
        let mut config = ScribeConfig::default();
        config.backends.grammar.url = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backends.grammar.url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = ScribeConfig::default();
        config.backends.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ScribeConfig::default();
        config.retrieval.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ScribeConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backends.classifier.name, "llama");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = ScribeConfig::default();
        config.retrieval.passages_file = Some("/data/passages.txt".to_string());
        config.save(&path).unwrap();

        let reloaded = ScribeConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.port, config.general.port);
        assert_eq!(reloaded.backends.citation, config.backends.citation);
        assert_eq!(
            reloaded.retrieval.passages_file.as_deref(),
            Some("/data/passages.txt")
        );
        assert_eq!(reloaded.keywords.structure, config.keywords.structure);
    }
}
