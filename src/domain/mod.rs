// Domain layer: record model, ports, and the pure conversion logic. No file access here.

pub mod merger;
pub mod model;
pub mod parser;
pub mod ports;
pub mod render;
