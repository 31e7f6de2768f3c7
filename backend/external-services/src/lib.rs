pub mod metrics;
pub mod service;
