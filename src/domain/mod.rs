// Domain layer: exchange event models and the ports the core talks through.

pub mod model;
pub mod ports;
