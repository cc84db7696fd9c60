/// Weight of an entrant that has never drawn the duty.
pub const BASE_WEIGHT: f64 = 1.0;
/// Share of the base weight removed per recorded win.
pub const WIN_PENALTY: f64 = 0.2;
/// Floor keeping every entrant's chance above zero.
pub const MIN_WEIGHT: f64 = 0.1;

/// Selection weight derived from an entrant's win count.
///
/// Each win shaves `WIN_PENALTY` off the base weight, floored at
/// `MIN_WEIGHT` so nobody ever drops out of the draw entirely. Pure and
/// infallible; `wins` being unsigned discharges the non-negative
/// precondition.
#[must_use]
pub fn selection_weight(wins: u32) -> f64 {
    (BASE_WEIGHT - f64::from(wins) * WIN_PENALTY).max(MIN_WEIGHT)
}
