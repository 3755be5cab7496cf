//! `Loadable<T>`: the single tagged value every source publishes.
//!
//! A source never exposes a `loading` flag next to a payload. Either the
//! payload has arrived (`Loaded`) or it has not (`NotLoaded`), so a reader can
//! never observe "initialized" paired with a stale payload.

use serde::{Deserialize, Serialize};

/// State of an asynchronously loaded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Loadable<T> {
    NotLoaded,
    Loaded(T),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::NotLoaded
    }
}

impl<T> Loadable<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NotLoaded)
    }

    /// Borrow the payload if it has arrived.
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::NotLoaded => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::NotLoaded => None,
        }
    }

    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Self::Loaded(value) => Loadable::Loaded(value),
            Self::NotLoaded => Loadable::NotLoaded,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Loaded(value) => Loadable::Loaded(f(value)),
            Self::NotLoaded => Loadable::NotLoaded,
        }
    }
}

impl<T> From<Option<T>> for Loadable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Loaded(v),
            None => Self::NotLoaded,
        }
    }
}
