// Domain layer: models, query description and ports. No HTTP here.

pub mod model;
pub mod ports;
pub mod query;
