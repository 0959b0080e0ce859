//! Branch names and the references they map to.

/// Name of the remote every clone fetches from.
pub const REMOTE_NAME: &str = "origin";

/// Returns the remote-tracking reference of `branch`.
pub fn remote_ref(branch: &str) -> String {
    format!("refs/remotes/{REMOTE_NAME}/{branch}")
}

/// Returns the local reference of `branch`.
pub fn local_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

/// Checks that `name` can be used as a branch name.
///
/// Resolvers produce names from free-form environment strings, so this runs
/// before any reference lookup. Returns the reason on failure.
pub fn validate_branch_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("branch name cannot be empty");
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err("branch name cannot start or end with '/'");
    }

    if name.starts_with('-') {
        return Err("branch name cannot start with '-'");
    }

    if name.contains("..") || name.contains("//") || name.contains("@{") {
        return Err("branch name cannot contain '..', '//' or '@{'");
    }

    if name.ends_with('.') || name.ends_with(".lock") {
        return Err("branch name cannot end with '.' or '.lock'");
    }

    if name.chars().any(|c| {
        c.is_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\')
    }) {
        return Err("branch name contains invalid characters");
    }

    Ok(())
}
