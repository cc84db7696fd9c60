use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use dutywheel_roster::RosterError;

use crate::layout::{Segment, FULL_TURN};

/// Guaranteed minimum number of full turns per spin.
pub const MIN_FULL_SPINS: u32 = 5;

/// Errors emitted by spin resolution and the spin lifecycle.
#[derive(Debug, Error)]
pub enum SpinError {
    /// Spin requested with no entrants (or zero total weight).
    #[error("cannot spin an empty wheel")]
    EmptyRoster,
    /// Committing the winner back to the roster failed.
    #[error(transparent)]
    Store(#[from] RosterError),
}

/// Source of uniform angles in `[0, 360)`. The only non-determinism in the
/// engine lives behind this trait, so tests can pin the draw.
pub trait AngleSampler {
    /// Samples one angle in `[0, 360)` degrees.
    fn sample(&mut self) -> f64;
}

/// Default sampler backed by a small fast RNG.
#[derive(Debug)]
pub struct UniformAngleSampler {
    rng: SmallRng,
}

impl UniformAngleSampler {
    /// Creates a sampler seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a reproducible sampler from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformAngleSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl AngleSampler for UniformAngleSampler {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(0.0..FULL_TURN)
    }
}

/// Fully resolved spin, ready to render and commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Winning entrant.
    pub winner_id: Uuid,
    /// Winning entrant's display name at spin time.
    pub winner_label: String,
    /// Wedge the pointer landed on, in pre-rotation coordinates.
    pub segment: Segment,
    /// Raw sampled angle in `[0, 360)`.
    pub sample: f64,
    /// Degrees this spin adds to the wheel.
    pub spin_delta: f64,
    /// New absolute orientation reduced to `[0, 360)`.
    pub final_rotation: f64,
    /// Rotation accumulated over every spin so far; never resets.
    pub new_cumulative_rotation: f64,
}

/// Resolves one spin: composes the sampled delta onto the prior cumulative
/// rotation and reverse-maps the fixed pointer (anchored at angle 0 in the
/// unrotated frame) onto the wedge now underneath it.
///
/// Pure and deterministic: the same `(previous_cumulative_rotation,
/// segments, sample)` always yields the same outcome, which is what keeps
/// the rendered wheel and the logical winner in agreement.
pub fn resolve_spin(
    previous_cumulative_rotation: f64,
    segments: &[Segment],
    sample: f64,
) -> Result<SpinOutcome, SpinError> {
    if segments.is_empty() {
        return Err(SpinError::EmptyRoster);
    }

    let spin_delta = f64::from(MIN_FULL_SPINS) * FULL_TURN + sample;
    let new_cumulative_rotation = previous_cumulative_rotation + spin_delta;
    let final_rotation = new_cumulative_rotation.rem_euclid(FULL_TURN);
    // The wheel turned clockwise by `final_rotation`; undoing that rotation
    // gives the pointer's position in the wedges' own frame.
    let pointer_angle = (FULL_TURN - final_rotation).rem_euclid(FULL_TURN);

    // The partition is gap-free over [0, 360), so exactly one wedge matches;
    // a miss can only be boundary rounding, and the last wedge owns the
    // wrap point.
    let fallback = &segments[segments.len() - 1];
    let segment = segments
        .iter()
        .find(|segment| segment.contains(pointer_angle))
        .unwrap_or(fallback);

    Ok(SpinOutcome {
        winner_id: segment.entrant_id,
        winner_label: segment.label.clone(),
        segment: segment.clone(),
        sample,
        spin_delta,
        final_rotation,
        new_cumulative_rotation,
    })
}
