use crate::hash::Fingerprint;
use crate::solution::{Solution, is_legal_solution};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A key/value sink for solutions, keyed by puzzle fingerprint.
pub trait SolutionStore {
    /// The stored solution, or `None` if there is none.
    fn load(&self, fingerprint: Fingerprint) -> Result<Option<Solution>, StoreError>;

    /// Store `solution`, replacing any existing entry.
    fn write(&mut self, fingerprint: Fingerprint, solution: &Solution) -> Result<(), StoreError>;

    /// Keep `history` as the best solution if it is a non-empty move
    /// sequence and no shorter or equally long solution is stored yet.
    /// Returns whether it was written.
    fn save(&mut self, fingerprint: Fingerprint, history: &str) -> Result<bool, StoreError> {
        if !is_legal_solution(history) {
            return Ok(false);
        }
        if let Some(existing) = self.load(fingerprint)? {
            if existing.moves() <= history.len() {
                debug!(
                    "keeping {} move solution for {}, offered {}",
                    existing.moves(),
                    fingerprint,
                    history.len()
                );
                return Ok(false);
            }
        }
        let solution = match Solution::parse(history) {
            Ok(solution) => solution,
            Err(_) => return Ok(false),
        };
        self.write(fingerprint, &solution)?;
        Ok(true)
    }
}

/// Stores each solution in its own file, named after the fingerprint in
/// lowercase hex, inside a configured directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
    extension: Option<&'static str>,
}

impl FsStore {
    /// Best solutions: one `<id>` file per puzzle.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        FsStore {
            dir: dir.into(),
            extension: None,
        }
    }

    /// Quick-save slots: one `<id>.sav` file per puzzle.
    pub fn quicksave<P: Into<PathBuf>>(dir: P) -> Self {
        FsStore {
            dir: dir.into(),
            extension: Some("sav"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, fingerprint: Fingerprint) -> PathBuf {
        let mut name = fingerprint.key();
        if let Some(extension) = self.extension {
            name.push('.');
            name.push_str(extension);
        }
        self.dir.join(name)
    }
}

impl SolutionStore for FsStore {
    fn load(&self, fingerprint: Fingerprint) -> Result<Option<Solution>, StoreError> {
        let path = self.path(fingerprint);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let Ok(contents) = String::from_utf8(bytes) else {
            warn!("ignoring {}: not valid UTF-8", path.display());
            return Ok(None);
        };
        match Solution::parse(contents.trim_end()) {
            Ok(solution) => Ok(Some(solution)),
            Err(err) => {
                warn!("ignoring {}: {}", path.display(), err);
                Ok(None)
            }
        }
    }

    fn write(&mut self, fingerprint: Fingerprint, solution: &Solution) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(fingerprint);
        fs::write(&path, solution.as_str()).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {} moves to {}", solution.moves(), path.display());
        Ok(())
    }
}

/// An in-memory store, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<Fingerprint, Solution>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SolutionStore for MemoryStore {
    fn load(&self, fingerprint: Fingerprint) -> Result<Option<Solution>, StoreError> {
        Ok(self.entries.get(&fingerprint).cloned())
    }

    fn write(&mut self, fingerprint: Fingerprint, solution: &Solution) -> Result<(), StoreError> {
        self.entries.insert(fingerprint, solution.clone());
        Ok(())
    }
}
