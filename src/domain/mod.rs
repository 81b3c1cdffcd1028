// Domain layer: table model and ports. No I/O happens here.

pub mod model;
pub mod ports;
