//! Verity CLI library.
//!
//! Terminal dashboard for the verification server: one-shot commands,
//! an interactive REPL with session history, and output formatting.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use client::VerityClient;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::{HistoryEntry, Session, SessionStats};
