pub mod snapshot;
pub mod source;

pub use snapshot::{KEY_SEPARATOR, Snapshot, compose_key};
pub use source::PropertySource;
