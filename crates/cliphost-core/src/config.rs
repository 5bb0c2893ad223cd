//! Configuration module
//!
//! This module provides the application configuration loaded from the
//! environment: server, database, authentication, and media-store settings.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_VIDEO_SIZE_MB: usize = 500;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MEDIA_STORE_TIMEOUT_SECS: u64 = 120;

/// Media store backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    /// HTTP media host (Cloudinary-style upload endpoint)
    Remote,
    /// Local filesystem, development and tests only
    Local,
}

impl FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(MediaBackend::Remote),
            "local" => Ok(MediaBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media backend: {}", s)),
        }
    }
}

impl Display for MediaBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackend::Remote => write!(f, "remote"),
            MediaBackend::Local => write!(f, "local"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub media_backend: MediaBackend,
    pub media_store_url: Option<String>,
    pub media_store_api_key: Option<String>,
    pub media_store_timeout_seconds: u64,
    pub local_media_path: Option<String>,
    pub local_media_base_url: Option<String>,
    pub max_video_size_bytes: usize,
    pub max_image_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let media_backend = env::var("MEDIA_STORE_BACKEND")
            .unwrap_or_else(|_| "remote".to_string())
            .parse::<MediaBackend>()?;

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            media_backend,
            media_store_url: env::var("MEDIA_STORE_URL").ok().filter(|s| !s.is_empty()),
            media_store_api_key: env::var("MEDIA_STORE_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            media_store_timeout_seconds: env::var("MEDIA_STORE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| MEDIA_STORE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(MEDIA_STORE_TIMEOUT_SECS),
            local_media_path: env::var("LOCAL_MEDIA_PATH").ok().filter(|s| !s.is_empty()),
            local_media_base_url: env::var("LOCAL_MEDIA_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            max_image_size_bytes: env::var("MAX_IMAGE_SIZE_MB")
                .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_IMAGE_SIZE_MB)
                * 1024
                * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.media_backend {
            MediaBackend::Remote => {
                if self.media_store_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "MEDIA_STORE_URL must be set when using the remote media backend"
                    ));
                }
                if self.media_store_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "MEDIA_STORE_API_KEY must be set when using the remote media backend"
                    ));
                }
            }
            MediaBackend::Local => {
                if self.local_media_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_MEDIA_PATH must be set when using the local media backend"
                    ));
                }
                if self.local_media_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_MEDIA_BASE_URL must be set when using the local media backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.jwt_expiry_hours
    }

    pub fn media_backend(&self) -> MediaBackend {
        self.media_backend
    }

    pub fn media_store_url(&self) -> Option<&str> {
        self.media_store_url.as_deref()
    }

    pub fn media_store_api_key(&self) -> Option<&str> {
        self.media_store_api_key.as_deref()
    }

    pub fn media_store_timeout_seconds(&self) -> u64 {
        self.media_store_timeout_seconds
    }

    pub fn local_media_path(&self) -> Option<&str> {
        self.local_media_path.as_deref()
    }

    pub fn local_media_base_url(&self) -> Option<&str> {
        self.local_media_base_url.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.max_video_size_bytes
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.max_image_size_bytes
    }
}
