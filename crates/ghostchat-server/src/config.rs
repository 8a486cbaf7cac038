use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "devserver.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pause after each streamed token. Zero streams as fast as the socket allows.
    pub token_delay_ms: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token_delay_ms: 0,
            enable_cors: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    stream: StreamSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_cors")]
    cors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct StreamSection {
    #[serde(default)]
    token_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors() -> bool {
    true
}

impl ServerConfig {
    /// Load from a TOML file when one is configured or present, otherwise
    /// from `GHOSTCHAT_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = config_path() {
            return Self::from_file(&path);
        }

        Ok(Self::from_env())
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path.display(), err))?;
        Self::from_toml(&contents)
            .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), err))
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        let parsed: FileConfig = toml::from_str(contents)?;
        Ok(Self {
            host: parsed.server.host,
            port: parsed.server.port,
            token_delay_ms: parsed.stream.token_delay_ms,
            enable_cors: parsed.server.cors,
        })
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from a variable lookup. Missing or unparseable values use defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("GHOSTCHAT_HOST").unwrap_or_else(default_host);
        let port = lookup("GHOSTCHAT_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let token_delay_ms = lookup("GHOSTCHAT_TOKEN_DELAY_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        let enable_cors = lookup("GHOSTCHAT_CORS")
            .and_then(|value| parse_flag(&value))
            .unwrap_or_else(default_cors);

        Self {
            host,
            port,
            token_delay_ms,
            enable_cors,
        }
    }

    pub fn token_delay(&self) -> Option<Duration> {
        (self.token_delay_ms > 0).then(|| Duration::from_millis(self.token_delay_ms))
    }

    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_path() -> Option<String> {
    if let Ok(path) = env::var("GHOSTCHAT_SERVER_CONFIG") {
        return Some(path);
    }
    Path::new(DEFAULT_CONFIG_FILE)
        .exists()
        .then(|| DEFAULT_CONFIG_FILE.to_string())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
