// Domain layer: submission models and the ports (interfaces) the engine depends on.

pub mod model;
pub mod ports;
