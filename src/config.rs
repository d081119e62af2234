use std::path::PathBuf;
use std::sync::OnceLock;

use crate::api::{CredentialProvider, YOUTUBE_API_BASE};
use crate::error::{Error, Result};

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";

/// Get the base data directory (~/.yt-sheet/)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        std::env::var("YT_SHEET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".yt-sheet")
            })
    })
}

/// Get the .env file path
pub fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Load environment variables from the data directory's .env file
pub fn load_env() {
    let env_path = env_file_path();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    } else {
        // Try current directory as fallback
        let _ = dotenvy::dotenv();
    }
}

/// Get the YouTube Data API key
pub fn youtube_api_key() -> Option<String> {
    std::env::var(API_KEY_VAR)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// API root, overridable for proxies and local mocks
pub fn api_base_url() -> String {
    std::env::var("YOUTUBE_API_BASE_URL").unwrap_or_else(|_| YOUTUBE_API_BASE.to_string())
}

/// Where exports go when no directory is given
pub fn default_output_dir() -> PathBuf {
    std::env::var("YT_SHEET_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Create the data directory if it doesn't exist
pub fn ensure_data_dir() -> Result<()> {
    std::fs::create_dir_all(data_dir())?;
    Ok(())
}

/// Create an export directory if it doesn't exist
pub fn ensure_output_dir(dir: &std::path::Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("{} is not a directory", dir.display())));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Reads the key from the process environment on every request
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        youtube_api_key()
    }
}
