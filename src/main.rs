use book_gallery::app::commands;
use book_gallery::config::toml_config::TomlConfig;
use book_gallery::config::FilterSettings;
use book_gallery::core::export::ExportFormat;
use book_gallery::utils::logger;
use book_gallery::{CatalogError, CliConfig, Command, Settings};
use clap::Parser;

fn report(e: &CatalogError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

async fn run(config: CliConfig) -> book_gallery::Result<String> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };

    // filters 只需要選項端點，不檢查資料庫連線設定
    if let Command::Filters = config.command {
        let settings = FilterSettings::resolve(config.overrides(), file)?;
        return commands::filters(&settings, config.format).await;
    }

    let settings = Settings::resolve(config.overrides(), file)?;
    tracing::debug!(
        "Catalog: {} table={} page_size={}",
        settings.catalog_url,
        settings.table,
        settings.page_size
    );

    let format = config.format;
    match config.command {
        Command::Browse {
            filters,
            pages,
            all,
        } => {
            let pages = if all { None } else { Some(pages) };
            commands::browse(&settings, filters.to_filter(None), pages, format).await
        }
        Command::Search { term, filters } => {
            commands::search(&settings, filters.to_filter(Some(term.as_str())), format).await
        }
        Command::Show { id } => commands::show(&settings, &id, format).await,
        Command::Filters => commands::filters(&FilterSettings::from(&settings), format).await,
        Command::Export {
            output,
            export_format,
            search,
            filters,
        } => {
            let export_format = export_format
                .as_deref()
                .map(str::parse::<ExportFormat>)
                .transpose()?;
            let filter = filters.to_filter(search.as_deref());
            commands::export(&settings, filter, &output, export_format).await
        }
        Command::Cover { id, output } => commands::cover(&settings, &id, &output).await,
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config.command);

    match run(config).await {
        Ok(output) => print!("{}", output),
        Err(e) => {
            report(&e);
            // 根據錯誤嚴重程度決定退出碼
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
