use anyhow::Result;
use book_gallery::app::commands::{self, OutputFormat};
use book_gallery::config::{FilterSettings, Overrides};
use book_gallery::core::export::ExportFormat;
use book_gallery::{BookFilter, CatalogError, Century, Settings};
use httpmock::prelude::*;
use tempfile::TempDir;

fn settings(server: &MockServer) -> Settings {
    Settings::resolve(
        Overrides {
            catalog_url: Some(server.base_url()),
            api_key: Some("anon-key".to_string()),
            page_size: Some(2),
            filters_url: Some(server.url("/exec")),
            timeout_seconds: Some(5),
            ..Default::default()
        },
        None,
    )
    .unwrap()
}

fn rows(titles: &[&str], start_id: usize) -> serde_json::Value {
    serde_json::Value::Array(
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::json!({
                    "id": format!("{}", start_id + i),
                    "titulo": t,
                    "autor": "Autor",
                    "ano": "1650"
                })
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_browse_loads_requested_pages() -> Result<()> {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param("offset", "0")
            .query_param("limit", "2");
        then.status(200).json_body(rows(&["Arte", "Baladas"], 1));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param("offset", "2")
            .query_param("limit", "2");
        then.status(200).json_body(rows(&["Cancioneiro", "Diálogos"], 3));
    });

    let output = commands::browse(&settings(&server), BookFilter::new(), Some(2), OutputFormat::Text)
        .await?;

    page1.assert();
    page2.assert();
    assert!(output.contains("[1] Arte"));
    assert!(output.contains("[4] Diálogos"));
    assert!(output.contains("more available (next page: 3)"));
    Ok(())
}

#[tokio::test]
async fn test_browse_all_stops_on_short_page() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros").query_param("offset", "0");
        then.status(200).json_body(rows(&["Arte", "Baladas"], 1));
    });
    let last = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros").query_param("offset", "2");
        then.status(200).json_body(rows(&["Cancioneiro"], 3));
    });

    let output =
        commands::browse(&settings(&server), BookFilter::new(), None, OutputFormat::Json).await?;

    last.assert();
    let listing: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(listing["count"], 3);
    assert_eq!(listing["has_more"], false);
    assert_eq!(listing["books"][2]["titulo"], "Cancioneiro");
    Ok(())
}

#[tokio::test]
async fn test_browse_with_service_error_shows_empty_list() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros");
        then.status(500).json_body(serde_json::json!({"message": "db down"}));
    });

    let output = commands::browse(&settings(&server), BookFilter::new(), Some(1), OutputFormat::Text)
        .await?;

    assert_eq!(output, "No books found.\n");
    Ok(())
}

#[tokio::test]
async fn test_search_sends_or_filter_and_century_bounds() -> Result<()> {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param(
                "or",
                "(titulo.ilike.*vieira*,autor.ilike.*vieira*,editora.ilike.*vieira*)",
            )
            .query_param("ano", "gte.1601")
            .query_param("ano", "lte.1700")
            .query_param("offset", "0")
            .query_param("limit", "10000");
        then.status(200).json_body(rows(&["Sermões"], 7));
    });

    let filter = BookFilter::new()
        .with_search("vieira")
        .with_century(Century::new(17)?);
    let output = commands::search(&settings(&server), filter, OutputFormat::Text).await?;

    search_mock.assert();
    assert!(output.contains("[1] Sermões"));
    assert!(!output.contains("more available"));
    Ok(())
}

#[tokio::test]
async fn test_show_fetches_by_id() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param("id", "eq.E3-12");
        then.status(200).json_body(serde_json::json!([{
            "id": "E3-12",
            "titulo": "Sermões",
            "autor": "António Vieira",
            "link1": "https://example.com/a"
        }]));
    });

    let output = commands::show(&settings(&server), "E3-12", OutputFormat::Text).await?;

    mock.assert();
    assert!(output.starts_with("Sermões\n"));
    assert!(output.contains("Location:    E3-12"));
    assert!(output.contains("Link 1: https://example.com/a"));
    Ok(())
}

#[tokio::test]
async fn test_show_unknown_id_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros");
        then.status(200).json_body(serde_json::json!([]));
    });

    let result = commands::show(&settings(&server), "missing", OutputFormat::Text).await;
    let err = result.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_filters_lists_remote_options_and_centuries() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(200).json_body(serde_json::json!({
            "categories": [{"value": "Poesia", "label": "Poesia"}],
            "cities": [{"value": "Évora", "label": "Évora"}]
        }));
    });

    let output =
        commands::filters(&FilterSettings::from(&settings(&server)), OutputFormat::Json).await?;
    let value: serde_json::Value = serde_json::from_str(&output)?;

    assert_eq!(value["categories"][0]["value"], "Poesia");
    assert_eq!(value["cities"][0]["label"], "Évora");
    assert_eq!(value["centuries"].as_array().map(|a| a.len()), Some(8));
    Ok(())
}

#[tokio::test]
async fn test_filters_failure_still_lists_centuries() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(500);
    });

    let output =
        commands::filters(&FilterSettings::from(&settings(&server)), OutputFormat::Text).await?;

    assert!(output.contains("Categories:\n  (none)"));
    assert!(output.contains("XVIII"));
    Ok(())
}

#[tokio::test]
async fn test_filters_runs_without_catalog_settings() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(200).json_body(serde_json::json!({
            "categories": [{"value": "Teatro", "label": "Teatro"}]
        }));
    });

    // 沒有資料庫網址與金鑰也能列出選項
    let settings = FilterSettings::resolve(
        Overrides {
            filters_url: Some(server.url("/exec")),
            ..Default::default()
        },
        None,
    )?;
    let output = commands::filters(&settings, OutputFormat::Text).await?;

    api_mock.assert();
    assert!(output.contains("Teatro"));
    assert!(output.contains("Cities:\n  (none)"));
    Ok(())
}

#[tokio::test]
async fn test_export_csv_writes_all_pages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("out").join("livros.csv");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param("cidade", "eq.Lisboa")
            .query_param("offset", "0");
        then.status(200).json_body(rows(&["Arte", "Baladas"], 1));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/livros")
            .query_param("cidade", "eq.Lisboa")
            .query_param("offset", "2");
        then.status(200).json_body(serde_json::json!([]));
    });

    let message = commands::export(
        &settings(&server),
        BookFilter::new().with_city("Lisboa"),
        &output_path,
        None,
    )
    .await?;

    assert!(message.starts_with("Exported 2 books"));
    let csv = std::fs::read_to_string(&output_path)?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().next().unwrap().starts_with("id,imagem,titulo"));
    Ok(())
}

#[tokio::test]
async fn test_export_fails_on_service_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("livros.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros");
        then.status(401).json_body(serde_json::json!({"message": "Invalid API key"}));
    });

    let result = commands::export(
        &settings(&server),
        BookFilter::new(),
        &output_path,
        Some(ExportFormat::Json),
    )
    .await;

    assert!(matches!(result, Err(CatalogError::ServiceError { status: 401, .. })));
    assert!(!output_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_cover_download() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("cover.jpg");

    let server = MockServer::start();
    let image_url = server.url("/img/7.jpg");
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros").query_param("id", "eq.7");
        then.status(200).json_body(serde_json::json!([{
            "id": 7,
            "titulo": "Sermões",
            "imagem": image_url
        }]));
    });
    let image = server.mock(|when, then| {
        when.method(GET).path("/img/7.jpg");
        then.status(200).body(vec![1u8, 2, 3, 4]);
    });

    let message = commands::cover(&settings(&server), "7", &output_path).await?;

    image.assert();
    assert!(message.contains("Sermões"));
    assert_eq!(std::fs::read(&output_path)?, vec![1u8, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn test_cover_missing_image_is_validation_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/livros");
        then.status(200)
            .json_body(serde_json::json!([{"id": "9", "titulo": "Sem capa", "imagem": ""}]));
    });

    let temp_dir = TempDir::new().unwrap();
    let result = commands::cover(&settings(&server), "9", &temp_dir.path().join("x.jpg")).await;
    assert!(matches!(result, Err(CatalogError::ValidationError { .. })));
}
