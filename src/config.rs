use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// The single origin allowed to call the API from a browser.
    pub cors_allowed_origin: String,
    pub frontend_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatEngineKind {
    Local,
    Remote,
}

impl std::str::FromStr for ChatEngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ChatEngineKind::Local),
            "remote" | "ollama" => Ok(ChatEngineKind::Remote),
            other => Err(anyhow::anyhow!("Unsupported chat engine: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub engine: ChatEngineKind,
    pub remote_url: String,
    pub remote_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origin: env::var("ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| "http://127.0.0.1:5500".to_string())
                    .trim()
                    .to_string(),
                frontend_dir: env::var("FRONTEND_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("frontend")),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://tramites.db".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            chat: ChatConfig {
                engine: env::var("CHAT_ENGINE")
                    .unwrap_or_else(|_| "local".to_string())
                    .parse()?,
                remote_url: env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                remote_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            },
            logging: LoggingConfig {
                log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
            },
        })
    }

    /// Configuration for tests and embedded use: in-memory database, local chat.
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                cors_allowed_origin: "http://127.0.0.1:5500".to_string(),
                frontend_dir: PathBuf::from("frontend"),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            chat: ChatConfig {
                engine: ChatEngineKind::Local,
                remote_url: "http://localhost:11434".to_string(),
                remote_model: "llama3".to_string(),
            },
            logging: LoggingConfig { log_dir: None },
        }
    }
}
