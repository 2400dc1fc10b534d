//! Law page retrieval from URLs, files, and stdin.
//!
//! No retries happen here; a failed fetch fails that law and the updater
//! moves on to the next one.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

#[cfg(feature = "fetch")]
use crate::LawDispatchError;
use crate::Result;

/// HTTP client configuration for fetching law pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("lawdispatch/{}", env!("CARGO_PKG_VERSION")) }
    }
}

/// Whether `location` should be fetched over HTTP rather than read from disk.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches HTML content from a URL.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| LawDispatchError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(LawDispatchError::InvalidUrl(format!(
            "{}: URL must use http:// or https://",
            url
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(LawDispatchError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                LawDispatchError::Timeout { timeout: config.timeout }
            } else {
                LawDispatchError::HttpError(e)
            }
        })?
        .error_for_status()?;

    let content = response.text().await?;
    tracing::debug!(%url, bytes = content.len(), "fetched law page");

    Ok(content)
}

/// Fetches a law page from a URL or, for anything else, a local file.
#[cfg(feature = "fetch")]
pub async fn fetch_source(location: &str, config: &FetchConfig) -> Result<String> {
    if is_remote(location) { fetch_url(location, config).await } else { fetch_file(location) }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(crate::LawDispatchError::FileNotFound(path_buf))
    } else {
        Ok(fs::read_to_string(&path_buf)?)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LawDispatchError;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("lawdispatch/"));
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://forum.example.com/viewtopic.php?p=1"));
        assert!(is_remote("http://example.com"));
        assert!(!is_remote("laws/act.html"));
        assert!(!is_remote("ftp://example.com/act.html"));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(LawDispatchError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_rejects_other_schemes() {
        let result = fetch_url("ftp://example.com/act.html", &FetchConfig::default()).await;
        assert!(matches!(result, Err(LawDispatchError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_source_reads_local_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("act.html");
        fs::write(&path, "<p>law</p>").unwrap();

        let content = fetch_source(path.to_str().unwrap(), &FetchConfig::default()).await.unwrap();
        assert_eq!(content, "<p>law</p>");
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(LawDispatchError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("act.html");
        fs::write(&path, "<div>Act</div>").unwrap();

        assert_eq!(fetch_file(path.to_str().unwrap()).unwrap(), "<div>Act</div>");
    }
}
