//! Named comparison groups of platform account handles.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Longest handle the platform accepts.
const MAX_HANDLE_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    /// Comparison group label, e.g. `pa-governor`.
    pub name: String,
    /// Account handles without the leading `@`.
    pub accounts: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountGroups {
    pub groups: Vec<AccountGroup>,
}

impl AccountGroups {
    /// Every handle across all groups, each once, in first-seen order.
    #[must_use]
    pub fn handles(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|g| g.accounts.iter())
            .filter(|h| seen.insert(h.to_lowercase()))
            .map(String::as_str)
            .collect()
    }

    /// Looks up a group by name, ignoring case.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&AccountGroup> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }
}

/// Load and validate account groups from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_account_groups(path: &Path) -> Result<AccountGroups, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AccountsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_account_groups(&content)
}

/// Parse and validate account groups from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_account_groups(yaml: &str) -> Result<AccountGroups, ConfigError> {
    let groups: AccountGroups = serde_yaml::from_str(yaml)?;
    validate_groups(&groups)?;
    Ok(groups)
}

fn validate_groups(groups: &AccountGroups) -> Result<(), ConfigError> {
    let mut seen_groups = HashSet::new();

    for group in &groups.groups {
        if group.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "group name must be non-empty".to_string(),
            ));
        }

        if !seen_groups.insert(group.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate group name: '{}'",
                group.name
            )));
        }

        let mut seen_handles = HashSet::new();
        for handle in &group.accounts {
            if !is_valid_handle(handle) {
                return Err(ConfigError::Validation(format!(
                    "group '{}' has invalid handle '{handle}'; expected 1-{MAX_HANDLE_LEN} of [A-Za-z0-9_]",
                    group.name
                )));
            }
            if !seen_handles.insert(handle.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "group '{}' lists handle '{handle}' more than once",
                    group.name
                )));
            }
        }
    }

    Ok(())
}

fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.len() <= MAX_HANDLE_LEN
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
