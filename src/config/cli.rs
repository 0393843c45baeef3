use crate::config::Overrides;
use crate::domain::model::Century;
use crate::domain::query::BookFilter;
use crate::app::commands::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "book-gallery")]
#[command(about = "Browse, search and export a hosted book catalog")]
pub struct CliConfig {
    /// Base URL of the hosted database
    #[arg(long = "url", env = "CATALOG_URL", global = true)]
    pub catalog_url: Option<String>,

    /// Anonymous API key for the hosted database
    #[arg(long = "key", env = "CATALOG_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Table holding the book records
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Rows per page when browsing
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Endpoint returning the category and city options
    #[arg(long, env = "CATALOG_FILTERS_URL", global = true)]
    pub filters_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "BOOK_GALLERY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format for listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List books page by page
    Browse {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to load
        #[arg(long, default_value = "1", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        pages: usize,

        /// Keep loading until the catalog is exhausted
        #[arg(long, conflicts_with = "pages")]
        all: bool,
    },
    /// Search titles, authors and publishers
    Search {
        term: String,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the full record of one book
    Show { id: String },
    /// List the available categories, cities and centuries
    Filters,
    /// Write every matching book to a file
    Export {
        #[arg(short, long)]
        output: PathBuf,

        /// csv or json; guessed from the file extension when omitted
        #[arg(long)]
        export_format: Option<String>,

        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Download the cover image of one book
    Cover {
        id: String,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// Century number (15-21) or Roman numeral (XV-XXI)
    #[arg(long)]
    pub century: Option<Century>,
}

impl FilterArgs {
    pub fn to_filter(&self, search: Option<&str>) -> BookFilter {
        BookFilter {
            search_term: search.map(str::to_string),
            category: self.category.clone(),
            city: self.city.clone(),
            century: self.century,
        }
        .normalized()
    }
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            catalog_url: self.catalog_url.clone(),
            api_key: self.api_key.clone(),
            table: self.table.clone(),
            page_size: self.page_size,
            filters_url: self.filters_url.clone(),
            timeout_seconds: self.timeout,
        }
    }
}
