#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Roster of duty-wheel entrants: ordered membership, win counters, and the
//! mutation API the spin engine commits through.

/// Entrant record.
pub mod entrant;
/// JSON-file-backed roster.
pub mod file_store;
/// In-memory roster and the store interface.
pub mod store;

pub use entrant::Entrant;
pub use file_store::FileRoster;
pub use store::{Roster, RosterError, RosterStore};
