//! The renderable result of a gate: loading, redirect, children, or fallback.

use serde::{Deserialize, Serialize};

/// What to show while a gate waits on its sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum LoadingIndicator {
    Spinner { message: String },
    /// Render nothing (role gate).
    Silent,
}

/// Outcome of evaluating a gate.
///
/// `F` is the fallback a hiding gate renders on denial; redirecting gates use
/// the default `()` and never produce `Fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateOutcome<F = ()> {
    Loading { indicator: LoadingIndicator },
    Redirect { to: String },
    Children,
    /// Denied without redirect. `None` renders nothing.
    Fallback { content: Option<F> },
}

impl<F> GateOutcome<F> {
    pub fn spinner(message: impl Into<String>) -> Self {
        Self::Loading {
            indicator: LoadingIndicator::Spinner {
                message: message.into(),
            },
        }
    }

    pub fn silent() -> Self {
        Self::Loading {
            indicator: LoadingIndicator::Silent,
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect { to: to.into() }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    pub fn renders_children(&self) -> bool {
        matches!(self, Self::Children)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { to } => Some(to),
            _ => None,
        }
    }

    /// Label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Redirect { .. } => "redirect",
            Self::Children => "children",
            Self::Fallback { .. } => "fallback",
        }
    }
}
