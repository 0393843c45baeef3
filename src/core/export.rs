use crate::domain::model::Book;
use crate::domain::query::BookFilter;
use crate::utils::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(CatalogError::InvalidConfigValueError {
                field: "export.format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: csv, json".to_string(),
            }),
        }
    }
}

impl ExportFormat {
    /// 依副檔名猜格式，猜不到就用 CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    exported_at: DateTime<Utc>,
    filter: &'a BookFilter,
    count: usize,
    books: &'a [Book],
}

pub fn to_csv(books: &[Book]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for book in books {
        writer.serialize(book)?;
    }
    writer
        .into_inner()
        .map_err(|e| CatalogError::IoError(e.into_error()))
}

pub fn to_json(books: &[Book], filter: &BookFilter) -> Result<Vec<u8>> {
    let export = JsonExport {
        exported_at: Utc::now(),
        filter,
        count: books.len(),
        books,
    };
    Ok(serde_json::to_vec_pretty(&export)?)
}

pub async fn write_export(
    path: &Path,
    format: ExportFormat,
    books: &[Book],
    filter: &BookFilter,
) -> Result<()> {
    let data = match format {
        ExportFormat::Csv => to_csv(books)?,
        ExportFormat::Json => to_json(books, filter)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &data).await?;

    tracing::info!(
        "💾 Exported {} books to {} ({} bytes)",
        books.len(),
        path.display(),
        data.len()
    );
    Ok(())
}
