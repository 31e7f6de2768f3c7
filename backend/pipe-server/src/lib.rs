pub mod app;
pub mod configs;
pub mod error;
pub mod logger;
pub mod pipe;
pub mod utils;
