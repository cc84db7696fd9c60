use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dutywheel_roster::Entrant;

use crate::weight::selection_weight;

/// Degrees in one full turn of the wheel.
pub const FULL_TURN: f64 = 360.0;

/// One wedge of the wheel, half-open over `[start_angle, end_angle)` in the
/// unrotated wheel frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Entrant the wedge belongs to.
    pub entrant_id: Uuid,
    /// Wedge label shown by renderers.
    pub label: String,
    /// Where the wedge starts, degrees in `[0, 360)`.
    pub start_angle: f64,
    /// Where the wedge ends, degrees in `(0, 360]`.
    pub end_angle: f64,
}

impl Segment {
    /// Angular width of the wedge in degrees.
    #[must_use]
    pub fn segment_angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether `angle` falls inside the wedge's half-open range.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Partitions the full circle into contiguous wedges proportional to each
/// entrant's selection weight, preserving roster order; the first entrant
/// starts at 0. An empty roster (or zero total weight) yields an empty
/// layout, which callers must treat as "no spin possible".
#[must_use]
pub fn layout(entrants: &[Entrant]) -> Vec<Segment> {
    let weights: Vec<f64> = entrants
        .iter()
        .map(|entrant| selection_weight(entrant.wins))
        .collect();
    let total: f64 = weights.iter().sum();
    if entrants.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(entrants.len());
    let mut current_angle = 0.0;
    for (entrant, weight) in entrants.iter().zip(&weights) {
        let share = weight / total * FULL_TURN;
        segments.push(Segment {
            entrant_id: entrant.id,
            label: entrant.name.clone(),
            start_angle: current_angle,
            end_angle: current_angle + share,
        });
        current_angle += share;
    }
    // Reconcile the last endpoint to exactly 360 so accumulated float
    // drift never leaves a sliver at the wrap point.
    if let Some(last) = segments.last_mut() {
        last.end_angle = FULL_TURN;
    }
    segments
}
