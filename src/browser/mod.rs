//! Browser session management and configuration

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, ExtractionOptions, LaunchOptions};
pub use session::BrowserSession;
