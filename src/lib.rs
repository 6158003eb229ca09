pub mod config;
pub mod driver;
pub mod http_probe;
