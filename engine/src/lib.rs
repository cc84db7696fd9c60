#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Weighted duty-wheel engine: wedge geometry sized by past wins,
//! deterministic spin resolution, and the single-in-flight spin lifecycle.

/// Wedge geometry proportional to selection weight.
pub mod layout;
/// Append-only history of committed spins.
pub mod ledger;
/// Spin lifecycle over a roster store.
pub mod session;
/// Deterministic spin resolution and angle sampling.
pub mod spin;
/// Win-count weighting model.
pub mod weight;

pub use layout::{layout, Segment, FULL_TURN};
pub use ledger::{SpinLedger, SpinRecord};
pub use session::{SpinSession, SpinState, WheelFrame};
pub use spin::{
    resolve_spin, AngleSampler, SpinError, SpinOutcome, UniformAngleSampler, MIN_FULL_SPINS,
};
pub use weight::{selection_weight, BASE_WEIGHT, MIN_WEIGHT, WIN_PENALTY};
