use crate::adapters::rest::error_for_status;
use crate::domain::model::FilterOptions;
use crate::domain::ports::FilterSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 從遠端腳本端點讀取城市與分類選項
#[derive(Debug, Clone)]
pub struct RemoteFilters {
    client: Client,
    url: String,
}

impl RemoteFilters {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        // 腳本端點通常會先 302 轉址一次
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl FilterSource for RemoteFilters {
    async fn fetch_filter_options(&self) -> Result<FilterOptions> {
        tracing::debug!("📡 Loading filter options from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let response = error_for_status(response).await?;
        let body = response.text().await?;
        let options: FilterOptions = serde_json::from_str(&body)?;
        tracing::debug!(
            "🏷️ Loaded {} categories and {} cities",
            options.categories.len(),
            options.cities.len()
        );
        Ok(options)
    }
}
