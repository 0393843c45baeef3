use crate::adapters::{HttpCovers, RemoteFilters, RestCatalog};
use crate::config::{FilterSettings, Settings};
use crate::core::export::{self, ExportFormat};
use crate::core::gallery::{FilterMenu, Gallery};
use crate::core::render;
use crate::domain::model::Book;
use crate::domain::ports::{ConfigProvider, CoverSource};
use crate::domain::query::BookFilter;
use crate::utils::error::{CatalogError, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    count: usize,
    has_more: bool,
    books: &'a [Book],
}

fn gallery<C: ConfigProvider>(config: &C) -> Result<Gallery<RestCatalog>> {
    let catalog = RestCatalog::from_config(config)?;
    Ok(Gallery::with_settings(
        catalog,
        config.table(),
        config.page_size(),
    ))
}

fn render_listing(gallery: &Gallery<RestCatalog>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&Listing {
            count: gallery.books().len(),
            has_more: gallery.has_more(),
            books: gallery.books(),
        })?),
        OutputFormat::Text => {
            let mut out = render::render_cards(gallery.books());
            if gallery.books().is_empty() {
                out.push_str("No books found.\n");
            } else if gallery.has_more() {
                out.push_str(&format!(
                    "\n… more available (next page: {})\n",
                    gallery.next_page()
                ));
            }
            Ok(out)
        }
    }
}

/// 瀏覽：`pages` 為 `None` 時載入全部
pub async fn browse(
    settings: &Settings,
    filter: BookFilter,
    pages: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let mut gallery = gallery(settings)?;
    // 網路錯誤只記錄，列表維持空白或部分結果
    if gallery.apply_filter(filter).await.is_ok() {
        let remaining = pages.map(|p| p.saturating_sub(1));
        if let Err(e) = gallery.load_all(remaining).await {
            tracing::warn!("⚠️ Stopped after {} books: {}", gallery.books().len(), e);
        }
    }
    tracing::info!("📚 {} books loaded", gallery.books().len());
    render_listing(&gallery, format)
}

pub async fn search(settings: &Settings, filter: BookFilter, format: OutputFormat) -> Result<String> {
    let mut gallery = gallery(settings)?;
    let _ = gallery.apply_filter(filter).await;
    render_listing(&gallery, format)
}

pub async fn show(settings: &Settings, id: &str, format: OutputFormat) -> Result<String> {
    let book = gallery(settings)?.find(id).await?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&book)?),
        OutputFormat::Text => Ok(render::render_detail(&book)),
    }
}

pub async fn filters(settings: &FilterSettings, format: OutputFormat) -> Result<String> {
    let mut menu = FilterMenu::new();
    match settings.filters_url.as_deref() {
        Some(url) => {
            let source = RemoteFilters::new(url, settings.timeout())?;
            menu.load(&source).await;
        }
        None => tracing::warn!("⚠️ No filters URL configured; only centuries are available"),
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "categories": menu.categories(),
            "cities": menu.cities(),
            "centuries": menu.centuries(),
        }))?),
        OutputFormat::Text => Ok([
            render::render_options("Categories", menu.categories()),
            render::render_options("Cities", menu.cities()),
            render::render_options("Centuries", &menu.centuries()),
        ]
        .join("\n")),
    }
}

/// 匯出所有符合條件的書；錯誤直接回報，不輸出半份檔案
pub async fn export(
    settings: &Settings,
    filter: BookFilter,
    output: &Path,
    format: Option<ExportFormat>,
) -> Result<String> {
    let mut gallery = gallery(settings)?;
    gallery.apply_filter(filter).await?;
    gallery.load_all(None).await?;

    let format = format.unwrap_or_else(|| ExportFormat::from_path(output));
    let filter = gallery.filter().clone();
    let books = gallery.into_books();
    export::write_export(output, format, &books, &filter).await?;
    Ok(format!("Exported {} books to {}\n", books.len(), output.display()))
}

pub async fn cover(settings: &Settings, id: &str, output: &Path) -> Result<String> {
    let book = gallery(settings)?.find(id).await?;
    let url = book
        .image_url()
        .ok_or_else(|| CatalogError::ValidationError {
            message: format!("Book '{}' has no cover image", id),
        })?;

    let covers = HttpCovers::new(
        settings.timeout(),
        settings.cover_retries,
        settings.cover_retry_delay(),
    )?;
    let bytes = covers.fetch_cover(url).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, &bytes).await?;
    Ok(format!(
        "Saved cover of '{}' to {} ({} bytes)\n",
        book.display_title(),
        output.display(),
        bytes.len()
    ))
}
