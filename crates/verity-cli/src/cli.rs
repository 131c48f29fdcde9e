//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Verity - check AI-generated answers against trusted evidence.
#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Server URL (overrides the configured one)
    #[arg(short, long, global = true, env = "VERITY_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (verdict only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify an answer to a question
    Verify(VerifyArgs),

    /// Show server health
    Health,

    /// Run the built-in demonstration check
    Demo,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the verify command.
#[derive(Debug, Clone, Parser)]
pub struct VerifyArgs {
    /// The question that was asked
    pub question: String,

    /// The answer to check
    pub answer: String,

    /// Skip the counter-evidence search
    #[arg(long)]
    pub no_counter: bool,

    /// Minimum confidence for a verified verdict (0.0-1.0)
    #[arg(long)]
    pub verified_threshold: Option<f64>,

    /// Minimum confidence for a suspected verdict (0.0-1.0)
    #[arg(long)]
    pub suspected_threshold: Option<f64>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["verity"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verify_command() {
        let cli = Cli::parse_from([
            "verity",
            "verify",
            "Who founded SpaceX?",
            "Elon Musk",
            "--no-counter",
            "--verified-threshold",
            "0.8",
        ]);
        match cli.command {
            Some(Command::Verify(args)) => {
                assert_eq!(args.question, "Who founded SpaceX?");
                assert!(args.no_counter);
                assert_eq!(args.verified_threshold, Some(0.8));
                assert_eq!(args.suspected_threshold, None);
            }
            _ => panic!("Expected Verify command"),
        }
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::parse_from(["verity", "demo", "--format", "json"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Some(Command::Demo)));
    }
}
