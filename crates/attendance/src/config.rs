//! Backend connection configuration
//!
//! Supports loading backend credentials from (in order of priority):
//! 1. Compile-time embedded credentials (for production builds)
//! 2. JSON file in the attendance config directory
//! 3. Runtime environment variables (fallback)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Credentials filename in the attendance config directory
const CREDENTIALS_FILE: &str = "backend-credentials.json";

/// Connection details for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendCredentials {
    /// Base URL of the hosted backend
    pub url: String,
    /// Publishable API key sent with every request
    pub anon_key: String,
    /// Base URL of the outreach service's ingestion endpoint, if configured
    pub ingest_url: Option<String>,
}

#[derive(Deserialize)]
struct CredentialFile {
    url: String,
    anon_key: String,
    #[serde(default)]
    ingest_url: Option<String>,
}

impl BackendCredentials {
    /// Load credentials using the following priority:
    /// 1. Compile-time embedded credentials (for production builds)
    /// 2. JSON file (~/.config/attendance/backend-credentials.json)
    /// 3. Runtime environment variables
    pub fn load() -> Result<Self> {
        // Try compile-time embedded credentials first (production builds)
        if let Some(credentials) = Self::from_compile_time() {
            return Ok(credentials);
        }

        // Try the config file
        if config::config_exists(CREDENTIALS_FILE) {
            let file: CredentialFile = config::load_json(CREDENTIALS_FILE)?;
            return Ok(Self::from_credential_file(file));
        }

        // Fall back to runtime environment variables
        Self::from_env()
    }

    /// Load credentials embedded at compile time via environment variables.
    /// Build with: ATTENDANCE_BACKEND_URL=xxx ATTENDANCE_BACKEND_KEY=yyy cargo build --release
    pub fn from_compile_time() -> Option<Self> {
        let url = option_env!("ATTENDANCE_BACKEND_URL")?;
        let anon_key = option_env!("ATTENDANCE_BACKEND_KEY")?;

        // Only return if both are non-empty
        if url.is_empty() || anon_key.is_empty() {
            return None;
        }

        Some(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
            ingest_url: option_env!("ATTENDANCE_INGEST_URL").map(|s| s.to_string()),
        })
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: CredentialFile = config::load_json_file(path)?;
        Ok(Self::from_credential_file(file))
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Ok(Self::from_credential_file(file))
    }

    fn from_credential_file(file: CredentialFile) -> Self {
        Self {
            url: file.url,
            anon_key: file.anon_key,
            ingest_url: file.ingest_url,
        }
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("ATTENDANCE_BACKEND_URL")
            .context("ATTENDANCE_BACKEND_URL environment variable not set")?;
        let anon_key = std::env::var("ATTENDANCE_BACKEND_KEY")
            .context("ATTENDANCE_BACKEND_KEY environment variable not set")?;

        Ok(Self {
            url,
            anon_key,
            ingest_url: std::env::var("ATTENDANCE_INGEST_URL").ok(),
        })
    }

    /// Get the default credentials file path (~/.config/attendance/backend-credentials.json)
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }

    /// Check if credentials are available (compile-time, file, or env vars)
    pub fn is_available() -> bool {
        if Self::from_compile_time().is_some() {
            return true;
        }
        if config::config_exists(CREDENTIALS_FILE) {
            return true;
        }
        std::env::var("ATTENDANCE_BACKEND_URL").is_ok()
            && std::env::var("ATTENDANCE_BACKEND_KEY").is_ok()
    }
}
