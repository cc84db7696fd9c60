use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single entrant on the duty wheel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entrant {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, unique case-insensitively within a roster.
    pub name: String,
    /// Number of duties already drawn.
    pub wins: u32,
    /// Timestamp when the entrant joined the roster.
    pub created_at: DateTime<Utc>,
}

impl Entrant {
    /// Creates a fresh entrant with zero wins.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wins: 0,
            created_at: Utc::now(),
        }
    }
}
