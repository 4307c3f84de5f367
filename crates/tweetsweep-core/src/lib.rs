pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod source;
pub mod storage;
pub mod sweep;

pub use config::AppConfig;
pub use credentials::Credentials;
pub use error::{Error, Result};
