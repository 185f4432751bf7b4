//! Last-good plan storage and link recovery.
//!
//! When a shared link fails to decode, the planner falls back to the last
//! encoding that did decode. The store holds exactly one encoded plan.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::codec;
use crate::error::DecodeError;
use crate::plan::Plan;

/// Holder of the single last-good encoding.
pub trait PlanStore {
    fn load(&self) -> Option<String>;
    fn save(&mut self, encoded: &str) -> io::Result<()>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(encoded: &str) -> Self {
        Self {
            value: Some(encoded.to_string()),
        }
    }
}

impl PlanStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn save(&mut self, encoded: &str) -> io::Result<()> {
        self.value = Some(encoded.to_string());
        Ok(())
    }
}

/// Store backed by one text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlanStore for FileStore {
    fn load(&self) -> Option<String> {
        let text = fs::read_to_string(&self.path).ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn save(&mut self, encoded: &str) -> io::Result<()> {
        fs::write(&self.path, encoded)
    }
}

/// Which encoding a restored plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// The candidate decoded; it is now the stored value.
    Candidate(Plan),
    /// The candidate failed; the stored encoding was used instead.
    Fallback { plan: Plan, error: DecodeError },
}

impl Restored {
    pub fn plan(&self) -> &Plan {
        match self {
            Restored::Candidate(plan) | Restored::Fallback { plan, .. } => plan,
        }
    }

    pub fn into_plan(self) -> Plan {
        match self {
            Restored::Candidate(plan) | Restored::Fallback { plan, .. } => plan,
        }
    }
}

/// Decode `candidate`, falling back to the stored encoding. A successful
/// candidate replaces the stored value. When both fail, the candidate's
/// error is returned.
pub fn restore_plan(candidate: &str, store: &mut dyn PlanStore) -> Result<Restored, DecodeError> {
    let decoded = codec::precheck(candidate).and_then(|_| codec::decode(candidate));
    let error = match decoded {
        Ok(plan) => {
            let payload = codec::extract_payload(candidate);
            if let Err(e) = store.save(payload) {
                log::warn!("could not save last-good plan: {}", e);
            }
            return Ok(Restored::Candidate(plan));
        }
        Err(e) => e,
    };

    log::warn!("plan link failed to decode ({}), trying stored plan", error);
    match store.load().map(|stored| codec::decode(&stored)) {
        Some(Ok(plan)) => Ok(Restored::Fallback { plan, error }),
        Some(Err(stored_err)) => {
            log::warn!("stored plan is unusable too: {}", stored_err);
            Err(error)
        }
        None => Err(error),
    }
}
