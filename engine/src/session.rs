use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dutywheel_roster::RosterStore;

use crate::{
    layout::{layout, Segment},
    ledger::{SpinLedger, SpinRecord},
    spin::{resolve_spin, AngleSampler, SpinError, SpinOutcome},
};

/// Mutable spin lifecycle state. Lives only in memory; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinState {
    /// Rotation accumulated over every spin; monotonically increasing,
    /// never reset, so consecutive spins compose visually.
    pub cumulative_rotation: f64,
    /// Whether a spin is currently settling.
    pub is_spinning: bool,
    /// Winner of the most recent committed spin.
    pub last_winner: Option<Uuid>,
}

/// Snapshot handed to renderers: the wedges plus the rotation to apply to
/// the whole assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelFrame {
    /// Ordered wedges with absolute degree boundaries.
    pub segments: Vec<Segment>,
    /// Rotation in degrees to apply to the assembly.
    pub rotation: f64,
}

struct SessionState {
    spin: SpinState,
    // Layout captured at spin start; renderers and the resolver both read
    // this one snapshot, so the drawn wedges and the logical winner cannot
    // diverge while the spin settles.
    pending_layout: Option<Vec<Segment>>,
}

/// Drives the spin lifecycle over a roster store: one spin in flight at a
/// time, layout snapshotted at spin start, winner committed after the
/// settle delay.
pub struct SpinSession<S, A> {
    store: S,
    sampler: Mutex<A>,
    state: Mutex<SessionState>,
    settle_delay: Duration,
    ledger: Option<SpinLedger>,
}

impl<S, A> SpinSession<S, A>
where
    S: RosterStore,
    A: AngleSampler,
{
    /// Creates a session with no settle delay and no history ledger.
    pub fn new(store: S, sampler: A) -> Self {
        Self {
            store,
            sampler: Mutex::new(sampler),
            state: Mutex::new(SessionState {
                spin: SpinState::default(),
                pending_layout: None,
            }),
            settle_delay: Duration::ZERO,
            ledger: None,
        }
    }

    /// Sets the settle delay matching the rendered animation length.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Attaches a spin history ledger.
    #[must_use]
    pub fn with_ledger(mut self, ledger: SpinLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// The roster store this session commits to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rotation accumulated over every committed spin.
    pub fn cumulative_rotation(&self) -> f64 {
        self.state.lock().spin.cumulative_rotation
    }

    /// Whether a spin is currently settling.
    pub fn is_spinning(&self) -> bool {
        self.state.lock().spin.is_spinning
    }

    /// Winner of the most recent committed spin.
    pub fn last_winner(&self) -> Option<Uuid> {
        self.state.lock().spin.last_winner
    }

    /// Current renderable frame. While a spin is settling this returns the
    /// layout snapshot taken at spin start; otherwise it lays out the live
    /// roster.
    pub fn wheel_frame(&self) -> WheelFrame {
        let state = self.state.lock();
        let segments = state
            .pending_layout
            .clone()
            .unwrap_or_else(|| layout(&self.store.snapshot()));
        WheelFrame {
            segments,
            rotation: state.spin.cumulative_rotation,
        }
    }

    /// Runs one spin to completion: snapshot, sample, settle, commit.
    ///
    /// Returns `Ok(None)` when a spin is already in flight (the request is
    /// an idempotent no-op) and `Err(SpinError::EmptyRoster)` when there is
    /// nothing to spin; neither mutates any state. Once a spin starts there
    /// is no cancellation: the winner's win count is incremented and the
    /// rotation advanced after the settle delay.
    pub async fn spin(&self) -> Result<Option<SpinOutcome>, SpinError> {
        let outcome = {
            let mut state = self.state.lock();
            if state.spin.is_spinning {
                return Ok(None);
            }
            let segments = layout(&self.store.snapshot());
            if segments.is_empty() {
                return Err(SpinError::EmptyRoster);
            }
            let sample = self.sampler.lock().sample();
            let outcome = resolve_spin(state.spin.cumulative_rotation, &segments, sample)?;
            state.spin.is_spinning = true;
            state.pending_layout = Some(segments);
            outcome
        };

        // Settle window matching the rendered animation; the state lock is
        // not held across the await.
        tokio::time::sleep(self.settle_delay).await;

        let commit = self.store.increment_wins(outcome.winner_id);
        {
            let mut state = self.state.lock();
            state.spin.is_spinning = false;
            state.pending_layout = None;
            if commit.is_ok() {
                state.spin.cumulative_rotation = outcome.new_cumulative_rotation;
                state.spin.last_winner = Some(outcome.winner_id);
            }
        }
        commit?;

        if let Some(ledger) = &self.ledger {
            // History must never fail a committed spin.
            if let Err(err) = ledger.append(&SpinRecord::from(&outcome)) {
                tracing::warn!("spin history append failed: {err:?}");
            }
        }

        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FULL_TURN;
    use dutywheel_roster::Roster;

    struct FixedSampler {
        samples: Vec<f64>,
        next: usize,
    }

    impl FixedSampler {
        fn new(samples: impl Into<Vec<f64>>) -> Self {
            Self {
                samples: samples.into(),
                next: 0,
            }
        }
    }

    impl AngleSampler for FixedSampler {
        fn sample(&mut self) -> f64 {
            let sample = self.samples[self.next % self.samples.len()];
            self.next += 1;
            sample
        }
    }

    fn even_pair() -> Roster {
        let roster = Roster::new();
        roster.add("A").unwrap();
        roster.add("B").unwrap();
        roster
    }

    #[tokio::test]
    async fn spin_commits_the_winner_and_advances_rotation() {
        let roster = even_pair();
        let a = roster.find_by_name("A").unwrap();
        let session = SpinSession::new(roster, FixedSampler::new([0.0]));

        let outcome = session.spin().await.unwrap().expect("spin should run");
        assert_eq!(outcome.winner_id, a.id);
        assert!((session.cumulative_rotation() - 5.0 * FULL_TURN).abs() < 1e-12);
        assert_eq!(session.last_winner(), Some(a.id));
        assert!(!session.is_spinning());

        let snapshot = session.store().snapshot();
        assert_eq!(snapshot[0].wins, 1);
        assert_eq!(snapshot[1].wins, 0);
    }

    #[tokio::test]
    async fn empty_roster_spin_is_refused_without_mutation() {
        let session = SpinSession::new(Roster::new(), FixedSampler::new([0.0]));
        let err = session.spin().await.unwrap_err();
        assert!(matches!(err, SpinError::EmptyRoster));
        assert!((session.cumulative_rotation()).abs() < 1e-12);
        assert_eq!(session.last_winner(), None);
        assert!(!session.is_spinning());
    }

    #[tokio::test]
    async fn concurrent_spin_request_is_silently_ignored() {
        let session = SpinSession::new(even_pair(), FixedSampler::new([0.0, 0.0]))
            .with_settle_delay(Duration::from_millis(50));

        // The first spin parks on its settle delay; the second request must
        // see the in-flight flag and turn into a no-op.
        let (first, second) = tokio::join!(session.spin(), session.spin());
        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());

        let total_wins: u32 = session.store().snapshot().iter().map(|e| e.wins).sum();
        assert_eq!(total_wins, 1);
    }

    #[tokio::test]
    async fn rotation_composes_across_consecutive_spins() {
        let session = SpinSession::new(even_pair(), FixedSampler::new([200.0, 45.0]));

        let first = session.spin().await.unwrap().unwrap();
        assert!((first.new_cumulative_rotation - 2000.0).abs() < 1e-12);

        let second = session.spin().await.unwrap().unwrap();
        assert!((second.new_cumulative_rotation - 3845.0).abs() < 1e-12);
        assert!((session.cumulative_rotation() - 3845.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn committed_spins_are_recorded_in_the_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = SpinLedger::open(dir.path().join("spins.jsonl")).unwrap();
        let session = SpinSession::new(even_pair(), FixedSampler::new([200.0])).with_ledger(ledger);

        let outcome = session.spin().await.unwrap().unwrap();

        let ledger = SpinLedger::open(dir.path().join("spins.jsonl")).unwrap();
        let records = ledger.load_recent(10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].winner_id, outcome.winner_id);
        assert!((records[0].cumulative_rotation - 2000.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn idle_wheel_frame_tracks_the_live_roster() {
        let roster = even_pair();
        let session = SpinSession::new(roster, FixedSampler::new([0.0]));

        let frame = session.wheel_frame();
        assert_eq!(frame.segments.len(), 2);
        assert!((frame.rotation).abs() < 1e-12);

        session.spin().await.unwrap().unwrap();
        let frame = session.wheel_frame();
        assert!((frame.rotation - 5.0 * FULL_TURN).abs() < 1e-12);
        // The winner's wedge shrank once the commit landed.
        assert!(frame.segments[0].segment_angle() < frame.segments[1].segment_angle());
    }
}
