//! Domain layer: models, errors, ports and stock specifications.

pub mod errors;
pub mod models;
pub mod ports;
pub mod specifications;
