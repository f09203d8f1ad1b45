use std::collections::HashMap;
use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Opaque client token -> display id
    #[serde(default)]
    pub tokens: HashMap<String, String>,

    pub displays: HashMap<String, DisplayConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { bind: default_bind(), port: default_port() }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Source type tag, resolved by the source registry (e.g. "file", "http")
    pub source: String,

    /// Refresh interval in seconds
    #[serde(default = "default_update_every")]
    pub update_every: u64,

    // source-specific settings
    pub path: Option<String>,
    pub url: Option<String>,
    pub content_type: Option<String>,
}

fn default_update_every() -> u64 {
    300
}

pub fn load(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

fn parse(content: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(content)?;
    for display_id in config.tokens.values() {
        if !config.displays.contains_key(display_id) {
            anyhow::bail!("token maps to unknown display '{}'", display_id);
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = parse(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 9090

            [tokens]
            a1b2c3 = "kitchen"

            [displays.kitchen]
            source = "http"
            update_every = 30
            url = "http://localhost:9000/render/kitchen"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.tokens.get("a1b2c3").unwrap(), "kitchen");

        let display = config.displays.get("kitchen").unwrap();
        assert_eq!(display.source, "http");
        assert_eq!(display.update_every, 30);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = parse(
            r#"
            [displays.kitchen]
            source = "file"
            path = "/var/lib/epaperd/kitchen.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.tokens.is_empty());
        assert_eq!(config.displays.get("kitchen").unwrap().update_every, 300);
    }

    #[test]
    fn rejects_token_pointing_at_unknown_display() {
        let err = parse(
            r#"
            [tokens]
            a1b2c3 = "hallway"

            [displays.kitchen]
            source = "file"
            path = "/var/lib/epaperd/kitchen.png"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown display"));
    }
}
