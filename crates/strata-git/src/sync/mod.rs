//! Synchronization bookkeeping for git sources.

mod state;

pub use state::SyncState;
