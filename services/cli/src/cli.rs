//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use securelog_client::KeyScheme;
use std::path::PathBuf;

/// securelog - operator client for the SecureLog service
///
/// Generates keys locally, runs encrypt/decrypt requests and browses the
/// audit log. Configuration comes from `SECURELOG_*` environment variables
/// or a `.env` file; flags override them.
#[derive(Parser, Debug)]
#[command(name = "securelog")]
#[command(version)]
#[command(about = "Operator client for the SecureLog encryption and audit-log service")]
#[command(long_about = r#"
securelog talks to the SecureLog service over HTTP.

Examples:
  # Generate a symmetric key
  securelog keygen --scheme symmetric

  # Generate an RSA pair; the private key goes to SECURELOG_CLIPBOARD_CMD
  SECURELOG_CLIPBOARD_CMD="wl-copy" securelog keygen --scheme asymmetric

  # Encrypt with a key read from a file
  securelog encrypt --key-file key.txt --data "hello"

  # Follow the audit log
  securelog logs --watch
"#)]
pub struct Cli {
    /// Service base URL (overrides SECURELOG_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate key material locally
    Keygen(KeygenArgs),
    /// Encrypt data through the service
    Encrypt(CryptoArgs),
    /// Decrypt data through the service
    Decrypt(CryptoArgs),
    /// List or follow the audit log
    Logs(LogsArgs),
    /// Round-trip a value through encrypt and decrypt, then list logs
    Smoke(SmokeArgs),
}

/// Key scheme as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeArg {
    /// 32 random bytes, base64url
    Symmetric,
    /// RSA-2048 key pair, PEM
    Asymmetric,
}

impl From<SchemeArg> for KeyScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Symmetric => Self::Symmetric,
            SchemeArg::Asymmetric => Self::Asymmetric,
        }
    }
}

/// `keygen` arguments.
#[derive(Args, Debug, Clone)]
pub struct KeygenArgs {
    /// Key scheme
    #[arg(long, value_enum, default_value_t = SchemeArg::Symmetric)]
    pub scheme: SchemeArg,
}

/// `encrypt` / `decrypt` arguments.
#[derive(Args, Debug, Clone)]
pub struct CryptoArgs {
    /// Key text
    #[arg(long, value_name = "KEY", conflicts_with = "key_file", required_unless_present = "key_file")]
    pub key: Option<String>,

    /// File holding the key (PEM or base64 text)
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Data to encrypt or decrypt
    #[arg(long)]
    pub data: String,
}

/// `logs` arguments.
#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// Page to show first (0-based)
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Keep polling; read n/p/r/q commands from stdin
    #[arg(long)]
    pub watch: bool,
}

/// `smoke` arguments.
#[derive(Args, Debug, Clone)]
pub struct SmokeArgs {
    /// Key scheme to exercise
    #[arg(long, value_enum, default_value_t = SchemeArg::Symmetric)]
    pub scheme: SchemeArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_key_and_key_file_conflict() {
        let parsed = Cli::try_parse_from([
            "securelog", "encrypt", "--key", "k", "--key-file", "k.txt", "--data", "d",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_key_is_required() {
        assert!(Cli::try_parse_from(["securelog", "decrypt", "--data", "d"]).is_err());
    }

    #[test]
    fn test_logs_defaults() {
        let cli = Cli::try_parse_from(["securelog", "logs"]).unwrap();
        let Commands::Logs(args) = cli.command else {
            panic!("expected logs");
        };
        assert_eq!(args.page, 0);
        assert!(!args.watch);
    }

    #[test]
    fn test_global_api_base() {
        let cli =
            Cli::try_parse_from(["securelog", "keygen", "--api-base", "http://10.0.0.5:8000"]).unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://10.0.0.5:8000"));
    }
}
