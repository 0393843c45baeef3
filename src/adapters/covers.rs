use crate::adapters::rest::error_for_status;
use crate::domain::ports::CoverSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_COVER_RETRIES: u32 = 1;
pub const DEFAULT_COVER_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// 下載封面圖；失敗時等待後重試
#[derive(Debug, Clone)]
pub struct HttpCovers {
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpCovers {
    pub fn new(timeout: Duration, retries: u32, retry_delay: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            retries,
            retry_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = error_for_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CoverSource for HttpCovers {
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(bytes) => {
                    tracing::debug!("🖼️ Downloaded cover {} ({} bytes)", url, bytes.len());
                    return Ok(bytes);
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Cover download failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.retries,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_cover_bytes() {
        let server = MockServer::start();
        let cover_mock = server.mock(|when, then| {
            when.method(GET).path("/covers/1.jpg");
            then.status(200)
                .header("Content-Type", "image/jpeg")
                .body(vec![0xFF, 0xD8, 0xFF]);
        });

        let covers = HttpCovers::new(Duration::from_secs(5), 1, Duration::from_millis(10)).unwrap();
        let bytes = covers.fetch_cover(&server.url("/covers/1.jpg")).await.unwrap();

        cover_mock.assert();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_failed_cover_is_retried_once() {
        let server = MockServer::start();
        let cover_mock = server.mock(|when, then| {
            when.method(GET).path("/covers/missing.jpg");
            then.status(503);
        });

        let covers = HttpCovers::new(Duration::from_secs(5), 1, Duration::from_millis(10)).unwrap();
        let result = covers.fetch_cover(&server.url("/covers/missing.jpg")).await;

        assert!(result.is_err());
        cover_mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_no_retry_when_disabled() {
        let server = MockServer::start();
        let cover_mock = server.mock(|when, then| {
            when.method(GET).path("/covers/missing.jpg");
            then.status(404);
        });

        let covers = HttpCovers::new(Duration::from_secs(5), 0, Duration::from_millis(10)).unwrap();
        assert!(covers.fetch_cover(&server.url("/covers/missing.jpg")).await.is_err());
        cover_mock.assert_hits(1);
    }
}
