use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Accounts to ingest from and the keywords that make a post relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub accounts: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Load and validate the watchlist from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_watchlist(&content)
}

/// Parse and validate watchlist YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_watchlist(content: &str) -> Result<Watchlist, ConfigError> {
    let watchlist: Watchlist = serde_yaml::from_str(content)?;
    validate_watchlist(&watchlist)?;
    Ok(watchlist)
}

fn validate_watchlist(watchlist: &Watchlist) -> Result<(), ConfigError> {
    if watchlist.accounts.is_empty() {
        return Err(ConfigError::Validation(
            "watchlist must list at least one account".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for account in &watchlist.accounts {
        if account.trim().is_empty() {
            return Err(ConfigError::Validation(
                "account name must be non-empty".to_string(),
            ));
        }
        if account.starts_with('@') {
            return Err(ConfigError::Validation(format!(
                "account '{account}' must be listed without the leading '@'"
            )));
        }
        if !seen.insert(account.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate account: '{account}'"
            )));
        }
    }

    if watchlist.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords must be non-empty strings".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "watchlist_test.rs"]
mod tests;
