//! Browser session used to capture live pages

pub mod config;
pub mod session;

pub use config::LaunchOptions;
pub use session::BrowserSession;
