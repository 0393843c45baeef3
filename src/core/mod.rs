pub mod export;
pub mod gallery;
pub mod render;

pub use crate::domain::model::{Book, Century, FilterOption, FilterOptions};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, CoverSource, FilterSource};
pub use crate::domain::query::{BookFilter, BookQuery, Predicate};
pub use crate::utils::error::Result;
