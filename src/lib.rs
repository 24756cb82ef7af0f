//! Spotistat Library
//!
//! A small web application that signs a visitor in with Spotify through the
//! OAuth 2.0 authorization code flow and shows the single track they played
//! most recently.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the landing, login, callback, recent and logout pages
//! - `config` - Configuration loaded once at startup from the environment
//! - `error` - Error types and their HTTP responses
//! - `server` - Router assembly and the listening loop
//! - `session` - Typed access to the per-request session cookie
//! - `spotify` - Spotify accounts and Web API client calls
//! - `types` - Wire payloads and session data
//! - `view` - Page models and template rendering
//!
//! # Example
//!
//! ```
//! use spotistat::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotistat::Res<()> {
//!     config::load_env();
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod view;

/// A convenient Result type alias for startup and other top-level operations.
///
/// Request handlers use [`error::AppError`] instead so failures map onto
/// HTTP responses.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Signed in {}", user);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures. Request handlers report errors through
/// [`error::AppError`] and [`warning!`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
