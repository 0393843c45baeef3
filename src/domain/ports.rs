use crate::domain::model::{Book, FilterOptions};
use crate::domain::query::BookQuery;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 書目資料來源：執行一次列查詢
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_books(&self, query: &BookQuery) -> Result<Vec<Book>>;
}

#[async_trait]
pub trait FilterSource: Send + Sync {
    async fn fetch_filter_options(&self) -> Result<FilterOptions>;
}

#[async_trait]
pub trait CoverSource: Send + Sync {
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn table(&self) -> &str;
    fn page_size(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
}
