// Domain layer: records returned by the API or shipped as fixtures, and the ports the core talks through.

pub mod model;
pub mod ports;
