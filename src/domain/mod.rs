// Domain layer: records, named masks and the ports the core talks through.

pub mod flags;
pub mod model;
pub mod ports;
