use crate::domain::model::Book;
use crate::domain::ports::{CatalogSource, ConfigProvider};
use crate::domain::query::BookQuery;
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// 透過託管資料庫的 REST 列查詢端點讀取書目
#[derive(Debug, Clone)]
pub struct RestCatalog {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestCatalog {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.catalog_url(),
            config.api_key(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

/// 把非 2xx 回應轉成錯誤，優先使用服務回傳的 `message`
pub(crate) async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            }
        });

    Err(CatalogError::ServiceError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CatalogSource for RestCatalog {
    async fn fetch_books(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let endpoint = self.endpoint(&query.table);
        let params = query.params();
        tracing::debug!("📡 GET {} {:?}", endpoint, params);

        let response = self
            .client
            .get(&endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await?;

        tracing::debug!("📡 Catalog response status: {}", response.status());
        let response = error_for_status(response).await?;

        // 先取文字再解析，格式錯誤歸為資料錯誤而非網路錯誤
        let body = response.text().await?;
        let books: Vec<Book> = serde_json::from_str(&body)?;
        tracing::debug!(
            "📚 Received {} rows (requested {}..={})",
            books.len(),
            query.rows.start(),
            query.rows.end()
        );
        Ok(books)
    }
}
