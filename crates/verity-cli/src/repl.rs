//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::VerifyArgs;
use crate::client::VerityClient;
use crate::commands;
use crate::config::{Config, Settings};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use verity_engine::ScoringPolicy;

/// Which verdict threshold a `set` command changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Minimum confidence for a verified verdict
    Verified,
    /// Minimum confidence for a suspected verdict
    Suspected,
}

/// REPL command type.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Prompt for a question and an answer, then verify
    Verify,
    /// List runs, newest first
    History,
    /// Session statistics and trend
    Stats,
    /// Forget the session history
    Clear,
    /// Write the history as CSV
    Export(PathBuf),
    /// Change a threshold, in percent
    Set(Threshold, u8),
    /// Toggle the counter-evidence search
    Counter(bool),
    /// Show server health
    Health,
    /// Run the demonstration check
    Demo,
    /// Show help
    Help,
    /// Leave the REPL
    Exit,
}

/// Run the interactive REPL.
pub async fn run_repl(config: &mut Config, client: &VerityClient, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("Verity REPL - Type 'help' for commands, 'exit' to quit"));
    println!("{}", formatter.info(&format!("Server: {}", client.base_url())));
    println!();

    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e))))?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = Session::new(config.settings.history_size);

    loop {
        match editor.readline("verity> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Verify) => {
                        let Some(args) = prompt_verify(&mut editor) else {
                            println!("{}", formatter.info("Cancelled"));
                            continue;
                        };
                        match commands::execute_verify(args, &config.settings, client, formatter).await {
                            Ok(response) => {
                                if let Err(e) = session.record(&response) {
                                    eprintln!("{}", formatter.error(&e.to_string()));
                                }
                            }
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, config, &mut session, client, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Ask for a question and then an answer; `None` when either is abandoned.
fn prompt_verify(editor: &mut DefaultEditor) -> Option<VerifyArgs> {
    let question = editor.readline("  question: ").ok()?;
    let answer = editor.readline("  answer: ").ok()?;
    Some(VerifyArgs {
        question,
        answer,
        no_counter: false,
        verified_threshold: None,
        suspected_threshold: None,
    })
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    config: &mut Config,
    session: &mut Session,
    client: &VerityClient,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::History => {
            println!("{}", formatter.format_history(session)?);
        }
        ReplCommand::Stats => {
            println!("{}", formatter.format_stats(session)?);
        }
        ReplCommand::Clear => {
            session.clear();
            println!("{}", formatter.success("History cleared"));
        }
        ReplCommand::Export(path) => {
            let rows = session.export_csv(&path)?;
            println!(
                "{}",
                formatter.success(&format!("Exported {} run(s) to {}", rows, path.display()))
            );
        }
        ReplCommand::Set(threshold, percent) => {
            if let Some(warning) = set_threshold(&mut config.settings, threshold, percent) {
                println!("{}", formatter.warning(&warning));
            }
            save_settings(config, formatter);
            println!(
                "{}",
                formatter.success(&format!("{:?} threshold set to {}%", threshold, percent))
            );
        }
        ReplCommand::Counter(enabled) => {
            config.settings.include_counter = enabled;
            save_settings(config, formatter);
            let state = if enabled { "on" } else { "off" };
            println!("{}", formatter.success(&format!("Counter-evidence {}", state)));
        }
        ReplCommand::Health => {
            commands::execute_health(client, formatter).await?;
        }
        ReplCommand::Demo => {
            let response = commands::execute_demo(client, formatter).await?;
            session.record(&response)?;
        }
        ReplCommand::Verify | ReplCommand::Help | ReplCommand::Exit => {}
    }

    Ok(())
}

fn save_settings(config: &Config, formatter: &Formatter) {
    if let Err(e) = config.save() {
        eprintln!("{}", formatter.warning(&format!("Settings not saved: {}", e)));
    }
}

/// Apply a threshold change; returns a warning when the thresholds end up inverted.
pub fn set_threshold(settings: &mut Settings, threshold: Threshold, percent: u8) -> Option<String> {
    let value = f64::from(percent) / 100.0;
    match threshold {
        Threshold::Verified => settings.verified_threshold = Some(value),
        Threshold::Suspected => settings.suspected_threshold = Some(value),
    }

    let defaults = ScoringPolicy::default();
    let verified = settings.verified_threshold.unwrap_or(defaults.verified_threshold);
    let suspected = settings.suspected_threshold.unwrap_or(defaults.suspected_threshold);
    (suspected > verified).then(|| {
        format!(
            "Suspected threshold ({:.0}%) is above verified threshold ({:.0}%); the server will reject requests",
            suspected * 100.0,
            verified * 100.0
        )
    })
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "verify" | "v" => Ok(ReplCommand::Verify),
        "history" => Ok(ReplCommand::History),
        "stats" => Ok(ReplCommand::Stats),
        "clear" => Ok(ReplCommand::Clear),
        "health" => Ok(ReplCommand::Health),
        "demo" => Ok(ReplCommand::Demo),
        "export" => parse_export_command(&parts[1..]),
        "set" => parse_set_command(&parts[1..]),
        "counter" => parse_counter_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_export_command(args: &[&str]) -> Result<ReplCommand> {
    match args {
        [path] => Ok(ReplCommand::Export(PathBuf::from(*path))),
        _ => Err(CliError::InvalidInput("Usage: export <file.csv>".to_string())),
    }
}

fn parse_set_command(args: &[&str]) -> Result<ReplCommand> {
    let usage = || CliError::InvalidInput("Usage: set <verified|suspected> <0-100>".to_string());

    let [name, value] = args else {
        return Err(usage());
    };
    let threshold = match *name {
        "verified" => Threshold::Verified,
        "suspected" => Threshold::Suspected,
        _ => return Err(usage()),
    };
    let percent: u8 = value.trim_end_matches('%').parse().map_err(|_| usage())?;
    if percent > 100 {
        return Err(usage());
    }

    Ok(ReplCommand::Set(threshold, percent))
}

fn parse_counter_command(args: &[&str]) -> Result<ReplCommand> {
    match args {
        ["on"] => Ok(ReplCommand::Counter(true)),
        ["off"] => Ok(ReplCommand::Counter(false)),
        _ => Err(CliError::InvalidInput("Usage: counter <on|off>".to_string())),
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  verify, v                      - Prompt for a question and answer, then verify");
    println!("  history                        - List this session's runs, newest first");
    println!("  stats                          - Averages and confidence trend");
    println!("  clear                          - Forget this session's runs");
    println!("  export <file.csv>              - Write this session's runs as CSV");
    println!("  set verified <0-100>           - Verified threshold, in percent");
    println!("  set suspected <0-100>          - Suspected threshold, in percent");
    println!("  counter on|off                 - Toggle the counter-evidence search");
    println!("  health                         - Show server health");
    println!("  demo                           - Run the built-in demonstration check");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
