#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::covers::{DEFAULT_COVER_RETRIES, DEFAULT_COVER_RETRY_DELAY};
use crate::domain::ports::ConfigProvider;
use crate::domain::query::{DEFAULT_PAGE_SIZE, DEFAULT_TABLE};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_PAGE_SIZE: usize = 1000;

/// 合併 CLI、環境變數與設定檔之後的最終設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub catalog_url: String,
    pub api_key: String,
    pub table: String,
    pub page_size: usize,
    pub filters_url: Option<String>,
    pub timeout_seconds: u64,
    pub cover_retries: u32,
    pub cover_retry_delay_ms: u64,
}

/// 命令列（含環境變數）給的值，未給的為 `None`
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub catalog_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub page_size: Option<usize>,
    pub filters_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Settings {
    /// 優先順序：命令列/環境變數 > 設定檔 > 預設值
    pub fn resolve(overrides: Overrides, file: Option<TomlConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let covers = file.covers.clone().unwrap_or_default();

        let catalog_url = overrides.catalog_url.or(file.catalog.url.clone());
        let api_key = overrides.api_key.or(file.catalog.key.clone());

        let settings = Self {
            catalog_url: validation::validate_required_field("catalog.url", &catalog_url)?.clone(),
            api_key: validation::validate_required_field("catalog.key", &api_key)?.clone(),
            table: overrides
                .table
                .or(file.catalog.table.clone())
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            page_size: overrides
                .page_size
                .or(file.catalog.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            filters_url: overrides
                .filters_url
                .or_else(|| file.filters_url().map(str::to_string)),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file.catalog.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            cover_retries: covers.retries.unwrap_or(DEFAULT_COVER_RETRIES),
            cover_retry_delay_ms: covers
                .retry_delay_ms
                .unwrap_or(DEFAULT_COVER_RETRY_DELAY.as_millis() as u64),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cover_retry_delay(&self) -> Duration {
        Duration::from_millis(self.cover_retry_delay_ms)
    }
}

/// `filters` 指令只需要選項端點，不需要資料庫連線設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSettings {
    pub filters_url: Option<String>,
    pub timeout_seconds: u64,
}

impl FilterSettings {
    pub fn resolve(overrides: Overrides, file: Option<TomlConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let settings = Self {
            filters_url: overrides
                .filters_url
                .or_else(|| file.filters_url().map(str::to_string)),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file.catalog.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for FilterSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_range("catalog.timeout_seconds", self.timeout_seconds, 1, 600)?;
        if let Some(url) = &self.filters_url {
            validation::validate_url("filters.url", url)?;
        }
        Ok(())
    }
}

impl From<&Settings> for FilterSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            filters_url: settings.filters_url.clone(),
            timeout_seconds: settings.timeout_seconds,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("catalog.url", &self.catalog_url)?;
        validation::validate_non_empty_string("catalog.key", &self.api_key)?;
        validation::validate_identifier("catalog.table", &self.table)?;
        validation::validate_range("catalog.page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        validation::validate_range("catalog.timeout_seconds", self.timeout_seconds, 1, 600)?;
        if let Some(url) = &self.filters_url {
            validation::validate_url("filters.url", url)?;
        }
        validation::validate_range("covers.retries", self.cover_retries, 0, 10)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}
