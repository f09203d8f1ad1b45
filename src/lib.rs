pub mod config;
pub mod engine;
pub mod http;
pub mod source;
pub mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
