// Adapters layer: HTTP implementations of the domain ports.

pub mod covers;
pub mod filters;
pub mod rest;

pub use covers::HttpCovers;
pub use filters::RemoteFilters;
pub use rest::RestCatalog;
