//! client-intake CLI entry point
//!
//! Customer intake with route-validated addresses - CLI + web API

use client_intake::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
