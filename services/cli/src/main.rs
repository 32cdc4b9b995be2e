//! securelog - operator CLI for the SecureLog service.
//!
//! # Usage
//!
//! ```bash
//! securelog keygen --scheme asymmetric
//! securelog encrypt --key-file key.txt --data "hello"
//! securelog decrypt --key-file private.pem --data "<ciphertext>"
//! securelog logs --page 2
//! securelog logs --watch
//! securelog smoke
//! ```
//!
//! Configuration is loaded from `SECURELOG_*` environment variables (via a
//! `.env` file when present). `--api-base` overrides the service URL.

mod cli;
mod clipboard;
mod commands;

use clap::Parser;
use cli::Cli;
use securelog_common::{TracingConfig, init_tracing, load_dotenv};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();

    match TracingConfig::from_env() {
        Ok(config) => init_tracing(&config.with_service_name("securelog-cli")),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
