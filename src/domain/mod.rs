// Domain layer: service contract types and the FedApi port.

pub mod model;
pub mod ports;
