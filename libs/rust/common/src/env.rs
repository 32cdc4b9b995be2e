//! Environment variable parsing shared by every configuration loader.

use crate::CommonError;
use std::env;
use std::str::FromStr;

/// Load a `.env` file from the working directory if one exists.
///
/// A missing file is not an error; variables already present in the
/// process environment take precedence over the file.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}

/// Parse an environment variable, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`CommonError::Config`] when the variable is set but cannot be parsed.
pub fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, CommonError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| CommonError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean flag, accepting `1/0`, `true/false`, `yes/no` and `on/off`.
///
/// # Errors
///
/// Returns [`CommonError::Config`] for any other value.
pub fn parse_env_flag(name: &str, default: bool) -> Result<bool, CommonError> {
    match env::var(name) {
        Ok(val) => parse_flag(&val)
            .ok_or_else(|| CommonError::config(format!("Invalid {name}: expected a boolean, got {val:?}"))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
