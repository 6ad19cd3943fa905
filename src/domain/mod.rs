// Domain layer: models and ports (interfaces). No HTTP or database types here.

pub mod model;
pub mod ports;
