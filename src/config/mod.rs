use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub catalog: CatalogConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared HMAC secret for issuing and verifying access tokens.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: i64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub url: Url,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CATALOG_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("CATALOG_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = Some(v);
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_TTL_SECS") {
            match parse_ttl(&v) {
                Some(ttl) => self.security.token_ttl_secs = ttl,
                None => tracing::warn!(
                    "Ignoring invalid SECURITY_TOKEN_TTL_SECS '{}': must be a positive number of seconds",
                    v
                ),
            }
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = parse_origins(&v);
        }

        // Catalog overrides
        if let Ok(v) = env::var("CATALOG_SEED_URL") {
            match Url::parse(&v) {
                Ok(url) => self.catalog.url = url,
                Err(e) => tracing::warn!("Ignoring invalid CATALOG_SEED_URL '{}': {}", v, e),
            }
        }
        if let Ok(v) = env::var("CATALOG_SEED_TIMEOUT_SECS") {
            self.catalog.timeout_secs = v.parse().unwrap_or(self.catalog.timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        self.security.jwt_secret = self.security.jwt_secret.filter(|s| !s.is_empty());
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            security: SecurityConfig {
                jwt_secret: None,
                token_ttl_secs: 60 * 60,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            catalog: CatalogConfig {
                url: default_catalog_url(),
                timeout_secs: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                ..Self::development().security
            },
            catalog: CatalogConfig {
                url: default_catalog_url(),
                timeout_secs: 10,
            },
            ..Self::development()
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                ..Self::development().security
            },
            catalog: CatalogConfig {
                url: default_catalog_url(),
                timeout_secs: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
            },
            ..Self::development()
        }
    }

    /// Development preset with the given signing secret; handy for tests.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.security.jwt_secret = Some(secret.into()).filter(|s: &String| !s.is_empty());
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_catalog_url() -> Url {
    Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid")
}

fn parse_ttl(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|ttl| *ttl > 0)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
