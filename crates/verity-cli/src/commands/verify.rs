//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::client::VerityClient;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use verity_server::api::{VerifyRequestBody, VerifyResponse};

/// Build the request body; flags take precedence over saved settings.
pub fn build_request(args: &VerifyArgs, settings: &Settings) -> Result<VerifyRequestBody> {
    if args.question.trim().is_empty() {
        return Err(CliError::InvalidInput("Question must not be empty".to_string()));
    }
    if args.answer.trim().is_empty() {
        return Err(CliError::InvalidInput("Answer must not be empty".to_string()));
    }

    let verified_threshold = args.verified_threshold.or(settings.verified_threshold);
    let suspected_threshold = args.suspected_threshold.or(settings.suspected_threshold);
    for threshold in [verified_threshold, suspected_threshold].into_iter().flatten() {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(
                "Thresholds must be between 0.0 and 1.0".to_string(),
            ));
        }
    }

    Ok(VerifyRequestBody {
        question: args.question.trim().to_string(),
        answer: args.answer.trim().to_string(),
        include_counter: settings.include_counter && !args.no_counter,
        verified_threshold,
        suspected_threshold,
    })
}

/// Execute the verify command.
pub async fn execute_verify(
    args: VerifyArgs,
    settings: &Settings,
    client: &VerityClient,
    formatter: &Formatter,
) -> Result<VerifyResponse> {
    let body = build_request(&args, settings)?;
    let response = client.verify(&body).await?;

    println!("{}", formatter.format_verification(&response)?);

    Ok(response)
}
