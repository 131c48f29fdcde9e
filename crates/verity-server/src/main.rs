//! `verity-server [--config <file>]`
//!
//! Without a config file the server runs on the bundled corpus with the
//! external lookup disabled.

use std::env;
use std::process;
use verity_server::{config::ServerConfig, start_server, ServerError};

const USAGE: &str = "Usage: verity-server [--config <file>]";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["--config", path] => ServerConfig::from_file(path)?,
        [] => ServerConfig::default_test_config(),
        ["--help"] | ["-h"] => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    start_server(config).await
}
