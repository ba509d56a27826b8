//! Data models and structures
//!
//! Defines the domain types produced by a tagging run and the runtime
//! configuration for talking to Imagga.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Vendor-assigned identifier for an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    /// Wraps a vendor ID, rejecting empty or whitespace-only values.
    pub fn new(value: String) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(Error::schema("content", "uploaded content ID is empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dominant color of the photo and the nearest named palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub color_name: String,
}

impl PhotoColor {
    pub fn new(red: u8, green: u8, blue: u8, color_name: impl Into<String>) -> Self {
        Self {
            red,
            green,
            blue,
            color_name: color_name.into(),
        }
    }

    /// `#rrggbb` form of the color.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Everything one successful run yields. Tags keep vendor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAnalysis {
    pub tags: Vec<String>,
    pub colors: Vec<PhotoColor>,
}

pub const DEFAULT_BASE_URL: &str = "https://api.imagga.com/v1";
pub const DEFAULT_JPEG_QUALITY: u8 = 50;
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub jpeg_quality: u8,
    pub upload_chunk_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        ignore_missing_dotenv(dotenvy::dotenv())?;
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{} not set", key)))
        };

        let base_url = lookup("IMAGGA_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = lookup("IMAGGA_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("IMAGGA_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let jpeg_quality = match lookup("JPEG_QUALITY") {
            Some(raw) => validate_quality(parse_number("JPEG_QUALITY", &raw)?)?,
            None => DEFAULT_JPEG_QUALITY,
        };

        let upload_chunk_size = match lookup("UPLOAD_CHUNK_SIZE") {
            Some(raw) => match parse_number::<usize>("UPLOAD_CHUNK_SIZE", &raw)? {
                0 => {
                    return Err(Error::Config(
                        "UPLOAD_CHUNK_SIZE must be greater than zero".to_string(),
                    ))
                }
                size => size,
            },
            None => DEFAULT_UPLOAD_CHUNK_SIZE,
        };

        Ok(Self {
            api_key: required("IMAGGA_API_KEY")?,
            api_secret: required("IMAGGA_API_SECRET")?,
            base_url,
            timeout,
            jpeg_quality,
            upload_chunk_size,
        })
    }
}

/// A missing `.env` file is fine; a malformed or unreadable one is not.
fn ignore_missing_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// JPEG quality must be within 1..=100.
pub fn validate_quality(quality: u8) -> Result<u8> {
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(Error::Config(format!(
            "JPEG quality must be between 1 and 100, got {}",
            quality
        )))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config =
            config_from(&[("IMAGGA_API_KEY", "key"), ("IMAGGA_API_SECRET", "secret")]).unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_secret, "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
        assert_eq!(config.jpeg_quality, 50);
        assert_eq!(config.upload_chunk_size, 16 * 1024);
    }

    #[test]
    fn test_config_overrides() {
        let config = config_from(&[
            ("IMAGGA_API_KEY", "key"),
            ("IMAGGA_API_SECRET", "secret"),
            ("IMAGGA_BASE_URL", "http://localhost:8080/v1/"),
            ("IMAGGA_TIMEOUT_SECS", "15"),
            ("JPEG_QUALITY", "80"),
            ("UPLOAD_CHUNK_SIZE", "1024"),
        ])
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.upload_chunk_size, 1024);
    }

    #[test]
    fn test_config_requires_credentials() {
        let err = config_from(&[("IMAGGA_API_KEY", "key")]).unwrap_err();
        assert!(err.to_string().contains("IMAGGA_API_SECRET"));

        let err = config_from(&[("IMAGGA_API_KEY", ""), ("IMAGGA_API_SECRET", "s")]).unwrap_err();
        assert!(err.to_string().contains("IMAGGA_API_KEY"));
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        let base = [("IMAGGA_API_KEY", "key"), ("IMAGGA_API_SECRET", "secret")];

        for bad in [
            ("JPEG_QUALITY", "0"),
            ("JPEG_QUALITY", "101"),
            ("JPEG_QUALITY", "high"),
            ("UPLOAD_CHUNK_SIZE", "0"),
            ("IMAGGA_TIMEOUT_SECS", "-1"),
        ] {
            let mut vars = base.to_vec();
            vars.push(bad);
            let err = config_from(&vars).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let missing = dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            ".env not found",
        ));
        assert!(ignore_missing_dotenv::<()>(Err(missing)).is_ok());
        assert!(ignore_missing_dotenv(Ok(())).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let malformed = dotenvy::Error::LineParse("IMAGGA_API_KEY key".to_string(), 15);
        let err = ignore_missing_dotenv::<()>(Err(malformed)).unwrap_err();
        assert!(matches!(err, Error::EnvVar(_)));

        let unreadable = dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ));
        let err = ignore_missing_dotenv::<()>(Err(unreadable)).unwrap_err();
        assert!(matches!(err, Error::EnvVar(_)));
    }

    #[test]
    fn test_content_id_rejects_empty() {
        assert!(ContentId::new(String::new()).is_err());
        assert!(ContentId::new("   ".to_string()).is_err());
        assert_eq!(ContentId::new("abc123".to_string()).unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_photo_color_hex() {
        assert_eq!(PhotoColor::new(10, 20, 30, "blue").hex(), "#0a141e");
        assert_eq!(PhotoColor::new(255, 255, 255, "white").hex(), "#ffffff");
    }

    #[test]
    fn test_photo_analysis_serialization() {
        let analysis = PhotoAnalysis {
            tags: vec!["cat".to_string()],
            colors: vec![PhotoColor::new(1, 2, 3, "black")],
        };

        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"color_name\":\"black\""));

        let back: PhotoAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }
}
