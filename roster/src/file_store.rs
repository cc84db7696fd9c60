use std::{
    fs,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{
    entrant::Entrant,
    store::{Roster, RosterError, RosterStore},
};

/// JSON-document-backed roster. Loads once at open and rewrites the whole
/// document after every successful mutation, so the file always reflects
/// the in-memory state.
#[derive(Debug)]
pub struct FileRoster {
    inner: Roster,
    path: PathBuf,
}

impl FileRoster {
    /// Opens the roster document. A missing file is an empty roster; the
    /// document is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RosterError> {
        let path = path.into();
        let inner = if path.exists() {
            let data = fs::read(&path)?;
            Roster::from_entrants(serde_json::from_slice(&data)?)
        } else {
            Roster::new()
        };
        Ok(Self { inner, path })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entrants on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the roster has no entrants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Ordered snapshot of every entrant.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entrant> {
        self.inner.snapshot()
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Entrant> {
        self.inner.find_by_name(name)
    }

    /// Appends a new entrant and persists the document.
    pub fn add(&self, name: &str) -> Result<Entrant, RosterError> {
        let entrant = self.inner.add(name)?;
        self.persist()?;
        Ok(entrant)
    }

    /// Removes an entrant and persists the document.
    pub fn remove(&self, id: Uuid) -> Result<Entrant, RosterError> {
        let entrant = self.inner.remove(id)?;
        self.persist()?;
        Ok(entrant)
    }

    /// Adds one win and persists the document.
    pub fn increment_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        let wins = self.inner.increment_wins(id)?;
        self.persist()?;
        Ok(wins)
    }

    /// Takes one win back (saturating at zero) and persists the document.
    pub fn decrement_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        let wins = self.inner.decrement_wins(id)?;
        self.persist()?;
        Ok(wins)
    }

    /// Resets every win counter and persists the document.
    pub fn reset_wins(&self) -> Result<(), RosterError> {
        self.inner.reset_wins();
        self.persist()
    }

    fn persist(&self) -> Result<(), RosterError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&self.inner.snapshot())?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl RosterStore for FileRoster {
    fn snapshot(&self) -> Vec<Entrant> {
        Self::snapshot(self)
    }

    fn increment_wins(&self, id: Uuid) -> Result<u32, RosterError> {
        Self::increment_wins(self, id)
    }
}
