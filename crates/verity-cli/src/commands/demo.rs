//! Demo command implementation.

use crate::client::VerityClient;
use crate::error::Result;
use crate::output::Formatter;
use verity_server::api::VerifyResponse;

/// Execute the built-in demonstration check.
pub async fn execute_demo(client: &VerityClient, formatter: &Formatter) -> Result<VerifyResponse> {
    let response = client.demo().await?;
    println!("{}", formatter.info(&format!("Q: {}", response.question)));
    println!("{}", formatter.info(&format!("A: {}", response.answer)));
    println!();
    println!("{}", formatter.format_verification(&response)?);
    Ok(response)
}
