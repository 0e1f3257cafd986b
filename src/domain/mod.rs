// Domain layer: mix/feature models, the boundary schema and ports (interfaces).

pub mod model;
pub mod ports;
pub mod schema;
