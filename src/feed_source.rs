//! Feed sources: where the raw timetable payload comes from.
//!
//! - Production: `HttpFeedSource` against the timetable endpoint
//! - Offline and tests: `FileFeedSource` reading a saved XML document

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::feed_xml::{self, RawFeedPayload};

/// Source of raw feed payloads
///
/// One call is one fetch; implementations do not cache.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<RawFeedPayload, FetchError>;

    /// Short human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Fetches the timetable XML over HTTP
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: String,
    authorization: Option<String>,
    timeout: Duration,
}

impl HttpFeedSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            authorization: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Value sent verbatim in the `Authorization` header
    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<RawFeedPayload, FetchError> {
        let start = Instant::now();
        debug!("Fetching timetable feed from {}", self.url);

        let mut request = self.client.get(&self.url).timeout(self.timeout);
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Timetable feed returned {}", status);
            metrics::counter!("feed.fetch.failed").increment(1);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let payload = feed_xml::decode_timetable(&body)?;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("feed.fetch.duration_ms").record(duration_ms);
        debug!(
            "Fetched {} bytes of timetable XML in {:.0}ms",
            body.len(),
            duration_ms
        );

        Ok(payload)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the timetable XML from a file on every fetch
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self) -> Result<RawFeedPayload, FetchError> {
        debug!("Reading timetable feed from {:?}", self.path);
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", self.path.display(), e)))?;
        feed_xml::decode_timetable(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_decodes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable.xml");
        std::fs::write(
            &path,
            "<FLIGHT_TYPE><FLIGHT><FLIGHT_NO>305</FLIGHT_NO></FLIGHT></FLIGHT_TYPE>",
        )
        .unwrap();

        let payload = FileFeedSource::new(&path).fetch().await.unwrap();
        assert_eq!(payload["FLIGHT_TYPE"]["FLIGHT"]["FLIGHT_NO"], "305");
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileFeedSource::new(dir.path().join("missing.xml"));
        assert!(matches!(source.fetch().await, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_file_source_bad_xml_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, "<FLIGHT_TYPE><FLIGHT>").unwrap();

        let source = FileFeedSource::new(&path);
        assert!(matches!(source.fetch().await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_file_source_rejects_non_timetable_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.xml");
        std::fs::write(&path, "<error><message>Unauthorized</message></error>").unwrap();

        let source = FileFeedSource::new(&path);
        assert!(matches!(source.fetch().await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_http_source_unreachable_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server
        let source = HttpFeedSource::new(Client::new(), "http://127.0.0.1:9/timetable")
            .with_timeout(Duration::from_secs(2));
        assert!(matches!(
            source.fetch().await,
            Err(FetchError::Transport(_))
        ));
    }
}
