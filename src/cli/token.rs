//! Token command handler

use crate::backend::HttpBackend;
use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

#[derive(Args)]
pub struct TokenArgs {
    /// Token to verify
    pub token: String,
}

/// Verify a token; fails unless the backend answers "ok"
pub async fn run(args: TokenArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let backend = HttpBackend::new(&config.backend)?;
    let response = backend.verify_token(&args.token).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_ok() {
        Ok(())
    } else {
        Err(Error::Backend(
            response
                .message
                .unwrap_or_else(|| format!("token rejected ({})", response.status)),
        ))
    }
}
