//! `tweetsent accounts`: prints the configured comparison groups.

use std::path::Path;

use tweetsent_core::AccountGroups;

/// One line per group: `name (n): handle, handle`, with notes indented below.
pub(crate) fn format_groups(groups: &AccountGroups) -> String {
    let mut out = String::new();
    for group in &groups.groups {
        out.push_str(&format!(
            "{} ({}): {}\n",
            group.name,
            group.accounts.len(),
            group.accounts.join(", ")
        ));
        if let Some(notes) = group.notes.as_deref() {
            out.push_str(&format!("    {notes}\n"));
        }
    }
    out
}

/// Loads and prints the account groups at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub(crate) fn run_list_accounts(path: &Path) -> anyhow::Result<()> {
    let groups = tweetsent_core::load_account_groups(path)?;
    print!("{}", format_groups(&groups));
    println!(
        "{} groups, {} distinct accounts",
        groups.groups.len(),
        groups.handles().len()
    );
    Ok(())
}
