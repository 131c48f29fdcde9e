//! Health command implementation.

use crate::client::VerityClient;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the health command.
pub async fn execute_health(client: &VerityClient, formatter: &Formatter) -> Result<()> {
    let health = client.health().await?;
    println!("{}", formatter.format_health(&health)?);
    if !health.scoring_model_ready {
        eprintln!("{}", formatter.warning("Scoring model is not ready"));
    }
    Ok(())
}
