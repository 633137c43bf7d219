//! Domain layer for the ledger subsystem

mod session;
mod snapshot;

pub use session::*;
pub use snapshot::*;
