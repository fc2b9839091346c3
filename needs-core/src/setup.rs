use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Whether first-time setup still has to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatus {
    /// The data file exists
    pub has_data: bool,
    /// No user group has been created yet
    pub needs_setup: bool,
}

/// Inspects a data file without initializing it.
///
/// Unreadable or malformed content is reported as "setup needed" rather than an error.
pub fn check_setup(data_file: &Path) -> SetupStatus {
    if !data_file.exists() {
        return SetupStatus {
            has_data: false,
            needs_setup: true,
        };
    }

    let needs_setup = match count_user_groups(data_file) {
        Ok(count) => count == 0,
        Err(e) => {
            warn!("Treating unreadable data file as empty: {:#}", e);
            true
        }
    };

    SetupStatus {
        has_data: true,
        needs_setup,
    }
}

fn count_user_groups(data_file: &Path) -> Result<usize> {
    let raw = fs::read_to_string(data_file)
        .with_context(|| format!("Failed to read {:?}", data_file))?;
    let doc: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {:?}", data_file))?;
    Ok(match doc.get("userGroups") {
        Some(serde_json::Value::Array(groups)) => groups.len(),
        _ => 0,
    })
}
