//! Client configuration.
//!
//! The frontend embeds a `config.toml` at build time; anything missing from it
//! falls back to the defaults below.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub security_forms: SecurityFormsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Absolute base URL of the REST API. Empty means "same host as the page,
    /// on `port`".
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct SecurityFormsConfig {
    /// Absolute base URL of the security-forms API. Empty means
    /// `{api base}{api prefix}/security`.
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_page_size() -> usize {
    50
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            port: default_port(),
            prefix: default_prefix(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Default configuration embedded in the crate
pub const DEFAULT_CONFIG: &str = r#"
[api]
base_url = ""
port = 3000
prefix = "/api"

[security_forms]
base_url = ""

[ui]
page_size = 50
"#;

impl ClientConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse `text`, falling back to the embedded defaults when it is invalid.
    ///
    /// Returns the parse error alongside so the caller can log it.
    pub fn parse_or_default(text: &str) -> (Self, Option<String>) {
        match Self::parse(text) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        }
    }

    /// Resolve the API root (base + prefix) given the page origin parts.
    pub fn api_root(&self, protocol: &str, hostname: &str) -> String {
        let base = if self.api.base_url.trim().is_empty() {
            format!("{}//{}:{}", protocol, hostname, self.api.port)
        } else {
            self.api.base_url.trim().trim_end_matches('/').to_string()
        };
        format!("{}{}", base, normalize_prefix(&self.api.prefix))
    }

    /// Resolve the security-forms API root given the page origin parts.
    pub fn forms_root(&self, protocol: &str, hostname: &str) -> String {
        let configured = self.security_forms.base_url.trim();
        if configured.is_empty() {
            format!("{}/security", self.api_root(protocol, hostname))
        } else {
            configured.trim_end_matches('/').to_string()
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = ClientConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.ui.page_size, 50);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = ClientConfig::parse("[api]\nport = 8080\n").unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.prefix, "/api");
        assert!(config.security_forms.base_url.is_empty());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let (config, err) = ClientConfig::parse_or_default("[api\nport = ");
        assert_eq!(config, ClientConfig::default());
        assert!(err.is_some());
    }

    #[test]
    fn test_api_root_derived_from_location() {
        let config = ClientConfig::default();
        assert_eq!(config.api_root("https:", "ops.local"), "https://ops.local:3000/api");
        assert_eq!(
            config.forms_root("https:", "ops.local"),
            "https://ops.local:3000/api/security"
        );
    }

    #[test]
    fn test_explicit_urls_win() {
        let text = r#"
[api]
base_url = "https://api.example.com/"
prefix = "v1/"

[security_forms]
base_url = "https://forms.example.com/api/"
"#;
        let config = ClientConfig::parse(text).unwrap();
        assert_eq!(config.api_root("http:", "ignored"), "https://api.example.com/v1");
        assert_eq!(config.forms_root("http:", "ignored"), "https://forms.example.com/api");
    }
}
