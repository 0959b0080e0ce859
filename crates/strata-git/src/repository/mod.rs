//! Local clone management.
//!
//! The clone is owned by a single source and only touched under its lock, so
//! nothing here is synchronized.

mod clone;
mod refs;

pub use clone::LocalClone;
pub use refs::{REMOTE_NAME, local_ref, remote_ref, validate_branch_name};
