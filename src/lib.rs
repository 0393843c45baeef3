pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};
pub use config::Settings;

pub use adapters::{HttpCovers, RemoteFilters, RestCatalog};
pub use crate::core::gallery::Gallery;
pub use domain::model::{Book, Century, FilterOption, FilterOptions};
pub use domain::query::{BookFilter, BookQuery};
pub use utils::error::{CatalogError, Result};
