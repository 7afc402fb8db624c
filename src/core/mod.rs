pub mod config;

pub use config::{AppConfig, Config, NOT_SET};
