//! Public loading entry points: file / string → [`Network`].
//!
//! The filtered variants take the two selective-load predicates; the plain
//! ones accept everything. A structural parse failure is logged once at
//! error level and returned as [`LoadError::Parse`] — lowering itself never
//! fails.

use std::collections::HashMap;
use std::path::Path;

use tracing::error;

use crate::error::LoadError;
use crate::lower::{lower_filtered, MessageFilter, SignalFilter};
use crate::parser;
use crate::reader::{read_all, FileLineReader};
use crate::types::network::Network;

/// Loads a `.dbc` file into a [`Network`], keeping every message and signal.
pub fn load_dbc_from_file(path: impl AsRef<Path>) -> Result<Network, LoadError> {
    load_dbc_from_file_filtered(path, &|_, _| true, &|_, _| true)
}

/// Loads a `.dbc` file, keeping only the messages and signals the predicates
/// accept (see [`MessageFilter`] and [`SignalFilter`]).
pub fn load_dbc_from_file_filtered(
    path: impl AsRef<Path>,
    message_filter: &MessageFilter<'_>,
    signal_filter: &SignalFilter<'_>,
) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if path.extension().and_then(|e| e.to_str()) != Some("dbc") {
        return Err(LoadError::InvalidExtension { path: display });
    }

    let mut reader = FileLineReader::open(path).map_err(|source| LoadError::OpenFile {
        path: display.clone(),
        source,
    })?;
    let content = read_all(&mut reader);
    if let Some(source) = reader.take_error() {
        return Err(LoadError::Read {
            path: display,
            source,
        });
    }

    load_dbc_from_str_filtered(&content, message_filter, signal_filter)
}

/// Parses DBC text into a [`Network`], keeping every message and signal.
pub fn load_dbc_from_str(text: &str) -> Result<Network, LoadError> {
    load_dbc_from_str_filtered(text, &|_, _| true, &|_, _| true)
}

/// Parses DBC text, keeping only the messages and signals the predicates
/// accept.
pub fn load_dbc_from_str_filtered(
    text: &str,
    message_filter: &MessageFilter<'_>,
    signal_filter: &SignalFilter<'_>,
) -> Result<Network, LoadError> {
    match parser::parse(text) {
        Ok(ast) => Ok(lower_filtered(&ast, message_filter, signal_filter)),
        Err(err) => {
            error!("Parse error: {}", err);
            Err(err.into())
        }
    }
}

/// Extension-dispatched multi-network loader.
///
/// Currently recognizes only `.dbc`, which always describes a single bus, so
/// the returned map holds one entry keyed by the empty string.
pub fn load_networks_from_file(
    path: impl AsRef<Path>,
) -> Result<HashMap<String, Network>, LoadError> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("dbc") => {
            let net = load_dbc_from_file(path)?;
            let mut networks = HashMap::new();
            networks.insert(String::new(), net);
            Ok(networks)
        }
        _ => Err(LoadError::InvalidExtension {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "VERSION \"\"\nNS_ :\nBS_:\nBU_:\n";

    #[test]
    fn rejects_wrong_extension() {
        let err = load_dbc_from_file("network.arxml").unwrap_err();
        assert!(matches!(err, LoadError::InvalidExtension { .. }));

        let err = load_networks_from_file("network.asc").unwrap_err();
        assert!(matches!(err, LoadError::InvalidExtension { .. }));
    }

    #[test]
    fn missing_file_reports_open_error() {
        let err = load_dbc_from_file("/nonexistent/can_network_missing.dbc").unwrap_err();
        assert!(matches!(err, LoadError::OpenFile { .. }));
    }

    #[test]
    fn parse_failure_surfaces_as_load_error() {
        let err = load_dbc_from_str("VERSION 42\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn multi_loader_keys_dbc_under_empty_string() {
        let path = std::env::temp_dir().join("can_network_multi_test.dbc");
        std::fs::write(&path, MINIMAL).unwrap();

        let networks = load_networks_from_file(&path).unwrap();
        assert_eq!(networks.len(), 1);
        assert!(networks.contains_key(""));

        std::fs::remove_file(&path).ok();
    }
}
