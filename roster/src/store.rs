use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::entrant::Entrant;

/// Errors emitted by roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Add requested with a blank display name.
    #[error("entrant name must not be empty")]
    EmptyName,
    /// Add requested with a name already on the roster (case-insensitive).
    #[error("entrant `{name}` is already on the roster")]
    DuplicateName {
        /// Conflicting name as submitted.
        name: String,
    },
    /// Operation referenced an id not present on the roster.
    #[error("no entrant with id {id}")]
    UnknownEntrant {
        /// Missing identifier.
        id: Uuid,
    },
    /// Filesystem I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read/commit interface the spin engine consumes. Everything beyond the
/// winner commit goes through the wider mutation API of the concrete store.
pub trait RosterStore {
    /// Ordered read-only snapshot of every entrant.
    fn snapshot(&self) -> Vec<Entrant>;

    /// Adds one win to the entrant, returning the new count.
    fn increment_wins(&self, id: Uuid) -> Result<u32, RosterError>;
}

/// In-memory ordered roster. Insertion order is the wheel order.
#[derive(Debug, Default)]
pub struct Roster {
    entrants: RwLock<Vec<Entrant>>,
}

impl Clone for Roster {
    fn clone(&self) -> Self {
        Self {
            entrants: RwLock::new(self.entrants.read().clone()),
        }
    }
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from already-loaded entrants, keeping their order.
    #[must_use]
    pub fn from_entrants(entrants: Vec<Entrant>) -> Self {
        Self {
            entrants: RwLock::new(entrants),
        }
    }

    /// Number of entrants on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entrants.read().len()
    }

    /// Whether the roster has no entrants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entrants.read().is_empty()
    }

    /// Ordered snapshot of every entrant.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entrant> {
        self.entrants.read().clone()
    }

    /// Appends a new entrant. The name is trimmed, must be non-empty, and
    /// must not collide case-insensitively with an existing entrant.
    pub fn add(&self, name: &str) -> Result<Entrant, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let needle = name.to_lowercase();
        let mut entrants = self.entrants.write();
        if entrants.iter().any(|e| e.name.to_lowercase() == needle) {
            return Err(RosterError::DuplicateName {
                name: name.to_string(),
            });
        }
        let entrant = Entrant::new(name);
        entrants.push(entrant.clone());
        Ok(entrant)
    }

    /// Removes an entrant, returning the removed record.
    pub fn remove(&self, id: Uuid) -> Result<Entrant, RosterError> {
        let mut entrants = self.entrants.write();
        let index = entrants
            .iter()
            .position(|e| e.id == id)
            .ok_or(RosterError::UnknownEntrant { id })?;
        Ok(entrants.remove(index))
    }

    /// Adds one win to the entrant, returning the new count.
    pub fn increment_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        self.update_wins(id, |wins| wins + 1)
    }

    /// Takes one win back, saturating at zero.
    pub fn decrement_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        self.update_wins(id, |wins| wins.saturating_sub(1))
    }

    /// Resets every win counter to zero, keeping membership and order.
    pub fn reset_wins(&self) {
        let mut entrants = self.entrants.write();
        for entrant in entrants.iter_mut() {
            entrant.wins = 0;
        }
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Entrant> {
        let needle = name.trim().to_lowercase();
        self.entrants
            .read()
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
            .cloned()
    }

    fn update_wins(&self, id: Uuid, apply: impl FnOnce(u32) -> u32) -> Result<u32, RosterError> {
        let mut entrants = self.entrants.write();
        let entrant = entrants
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RosterError::UnknownEntrant { id })?;
        entrant.wins = apply(entrant.wins);
        Ok(entrant.wins)
    }
}

impl RosterStore for Roster {
    fn snapshot(&self) -> Vec<Entrant> {
        Self::snapshot(self)
    }

    fn increment_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        Self::increment_wins(self, id)
    }
}
