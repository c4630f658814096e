pub mod config;
pub mod error;
pub mod fs;
pub mod mime;
pub mod pipeline;
pub mod sec;
pub mod store;
pub mod table;
mod tui;

pub use config::{Config, Mode, TableWriteMode};
pub use error::{Disposition, Error, Result};

/// Shortcut for required API elements.
pub mod http {
    pub use reqwest::Client as HttpClient;
}
