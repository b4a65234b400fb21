// catalog_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Clone)]
pub struct DatabaseConfig {
  /// Full connection URL. When present the individual parts are ignored.
  pub url: Option<String>,
  pub host: String,
  pub port: u16,
  pub user: String,
  pub password: String,
  pub name: String,
  pub ssl_mode: PgSslMode,
  pub max_connections: u32,
}

impl DatabaseConfig {
  pub fn connect_options(&self) -> Result<PgConnectOptions> {
    if let Some(url) = &self.url {
      return PgConnectOptions::from_str(url).map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)));
    }
    Ok(
      PgConnectOptions::new()
        .host(&self.host)
        .port(self.port)
        .username(&self.user)
        .password(&self.password)
        .database(&self.name)
        .ssl_mode(self.ssl_mode),
    )
  }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DatabaseConfig")
      .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
      .field("host", &self.host)
      .field("port", &self.port)
      .field("user", &self.user)
      .field("name", &self.name)
      .field("ssl_mode", &self.ssl_mode)
      .field("max_connections", &self.max_connections)
      .finish_non_exhaustive()
  }
}

#[derive(Clone)]
pub struct S3Config {
  pub bucket: String,
  pub region: String,
  pub access_key_id: Option<String>,
  pub secret_access_key: Option<String>,
  /// Prefix every locator is built from: `{public_base_url}/{key}`.
  pub public_base_url: String,
}

impl std::fmt::Debug for S3Config {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("S3Config")
      .field("bucket", &self.bucket)
      .field("region", &self.region)
      .field("static_credentials", &self.access_key_id.is_some())
      .field("public_base_url", &self.public_base_url)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database: DatabaseConfig,
  pub s3: S3Config,
  pub max_upload_bytes: usize,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Reads the process environment, after loading `.env` if one exists.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source. Blank values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_opt = |var_name: &str| lookup(var_name).filter(|v| !v.trim().is_empty());
    let get_env = |var_name: &str| {
      get_opt(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let get_or = |var_name: &str, default: &str| get_opt(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "0.0.0.0");
    let server_port = get_or("PORT", &DEFAULT_PORT.to_string())
      .trim()
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;

    let url = get_opt("DATABASE_URL");
    let db_part = |var_name: &str| match &url {
      Some(_) => Ok(get_opt(var_name).unwrap_or_default()),
      None => get_env(var_name),
    };
    let database = DatabaseConfig {
      host: db_part("DB_HOST")?,
      user: db_part("DB_USER")?,
      password: db_part("DB_PASSWORD")?,
      name: db_part("DB_NAME")?,
      port: get_or("DB_PORT", "5432")
        .trim()
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid DB_PORT: {}", e)))?,
      ssl_mode: PgSslMode::from_str(get_or("DB_SSLMODE", "require").trim())
        .map_err(|e| AppError::Config(format!("Invalid DB_SSLMODE: {}", e)))?,
      max_connections: get_or("DB_MAX_CONNECTIONS", "5")
        .trim()
        .parse::<u32>()
        .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?,
      url,
    };

    let bucket = get_env("S3_BUCKET_NAME")?;
    let region = get_env("AWS_REGION")?;
    let public_base_url = get_opt("S3_PUBLIC_BASE_URL")
      .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket, region))
      .trim_end_matches('/')
      .to_string();
    let access_key_id = get_opt("AWS_ACCESS_KEY_ID");
    let secret_access_key = get_opt("AWS_SECRET_ACCESS_KEY");
    if access_key_id.is_some() != secret_access_key.is_some() {
      return Err(AppError::Config(
        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
      ));
    }
    let s3 = S3Config {
      bucket,
      region,
      access_key_id,
      secret_access_key,
      public_base_url,
    };

    let max_upload_bytes = get_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
      .trim()
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_BYTES: {}", e)))?;

    let log_format = match get_or("LOG_FORMAT", "text").trim().to_ascii_lowercase().as_str() {
      "text" | "pretty" => LogFormat::Text,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database,
      s3,
      max_upload_bytes,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
