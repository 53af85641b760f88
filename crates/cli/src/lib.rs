//! NovaForge storefront command-line client.
//!
//! Browses the catalog, manages the persisted cart and session, and hands
//! checkout off to the payment page.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod render;

pub use app::App;
pub use args::{Cli, Command};
pub use config::{Config, LogFormat};
pub use error::CliError;
