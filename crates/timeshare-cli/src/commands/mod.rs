pub mod batch;
pub mod compute;
pub mod config;
pub mod sample;

use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

use timeshare_core::{Config, ConfigError, CoreError};

/// Shared state for every command.
pub struct Context {
    config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Config::path(),
        }
    }

    pub fn config(&self) -> Result<Config, ConfigError> {
        Config::load_from(&self.config_path()?)
    }
}

/// Resolve a command input: inline JSON, else a file path; absent or `-`
/// reads stdin.
pub fn read_input(input: Option<&str>) -> Result<String, CoreError> {
    match input {
        None | Some("-") => {
            tracing::debug!("reading input from stdin");
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(arg) if serde_json::from_str::<serde_json::Value>(arg).is_ok() => {
            tracing::debug!("reading input from command-line argument");
            Ok(arg.to_string())
        }
        Some(path) => {
            tracing::debug!(path, "reading input from file");
            Ok(std::fs::read_to_string(path)?)
        }
    }
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Print `{"error": ...}` on stdout and hand the error back for the exit status.
pub fn report<T: Serialize>(
    outcome: Result<T, CoreError>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(value) => {
            print_json(&value, pretty)?;
            Ok(())
        }
        Err(err) => {
            tracing::error!(%err, "computation failed");
            print_json(&serde_json::json!({ "error": err.to_string() }), pretty)?;
            Err(err.into())
        }
    }
}
