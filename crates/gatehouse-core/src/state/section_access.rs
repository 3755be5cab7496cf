//! Per-route unlock table.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GateResult;
use crate::loadable::Loadable;
use crate::source::{SourceCell, SourceReceiver};

/// Normalize a route path: drop query and fragment, collapse repeated and
/// trailing slashes, force a leading slash. The empty path is `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("").trim();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Route → unlocked mapping for one user.
///
/// Lookups use the most specific entry: `/leads/42` is decided by a
/// `/leads/42` entry if present, otherwise by `/leads`. The root entry `/`
/// only decides the root route itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct SectionAccess {
    entries: FxHashMap<String, bool>,
}

impl SectionAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `{"/path": bool}` as stored by the backend.
    pub fn from_json(json: &str) -> GateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn set(&mut self, path: &str, unlocked: bool) -> bool {
        let key = normalize_path(path);
        self.entries.insert(key, unlocked) != Some(unlocked)
    }

    pub fn is_unlocked(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let mut candidate = path.as_str();
        loop {
            if let Some(unlocked) = self.entries.get(candidate) {
                return *unlocked;
            }
            match candidate.rfind('/') {
                Some(0) | None => return false,
                Some(idx) => candidate = &candidate[..idx],
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unlocked paths in sorted order.
    pub fn unlocked_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, unlocked)| **unlocked)
            .map(|(path, _)| path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }
}

impl<S: AsRef<str>> FromIterator<(S, bool)> for SectionAccess {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut access = Self::new();
        for (path, unlocked) in iter {
            access.set(path.as_ref(), unlocked);
        }
        access
    }
}

impl From<BTreeMap<String, bool>> for SectionAccess {
    fn from(map: BTreeMap<String, bool>) -> Self {
        map.into_iter().collect()
    }
}

impl From<SectionAccess> for BTreeMap<String, bool> {
    fn from(access: SectionAccess) -> Self {
        access.entries.into_iter().collect()
    }
}

/// Writer for the section access source.
#[derive(Debug)]
pub struct SectionAccessStore {
    cell: SourceCell<SectionAccess>,
}

impl SectionAccessStore {
    pub fn new() -> Self {
        Self {
            cell: SourceCell::new("section_access"),
        }
    }

    pub fn load(&self, access: SectionAccess) {
        debug!(entries = access.len(), "section access loaded");
        self.cell.publish(Loadable::Loaded(access));
    }

    pub fn load_json(&self, json: &str) -> GateResult<()> {
        self.load(SectionAccess::from_json(json)?);
        Ok(())
    }

    /// Unlock one route in the loaded table. Ignored before the table loads;
    /// the initial load is authoritative.
    pub fn unlock(&self, path: &str) -> bool {
        self.cell.update(|current| match current {
            Loadable::Loaded(access) => access.set(path, true),
            Loadable::NotLoaded => false,
        })
    }

    pub fn clear(&self) {
        self.cell.reset();
    }

    /// `false` until the table has loaded. Gates must check loading first.
    pub fn is_section_unlocked(&self, path: &str) -> bool {
        self.cell
            .snapshot()
            .as_loaded()
            .is_some_and(|access| access.is_unlocked(path))
    }

    pub fn snapshot(&self) -> Loadable<SectionAccess> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> SourceReceiver<SectionAccess> {
        self.cell.subscribe()
    }
}

impl Default for SectionAccessStore {
    fn default() -> Self {
        Self::new()
    }
}
