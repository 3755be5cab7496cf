//! Redirect targets and loading texts.

use serde::{Deserialize, Serialize};

use crate::errors::{GateError, GateResult};

/// Where each gate sends a denied visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Sign-in page for visitors without a session.
    pub sign_in: String,
    /// Landing route for section and elevated-privilege denials.
    pub default: String,
    /// Upsell route for visitors without an active subscription.
    pub pricing: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            sign_in: "/auth".to_string(),
            default: "/".to_string(),
            pricing: "/pricing".to_string(),
        }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> GateResult<()> {
        for (field, value) in [
            ("routes.sign_in", &self.sign_in),
            ("routes.default", &self.default),
            ("routes.pricing", &self.pricing),
        ] {
            if !value.starts_with('/') {
                return Err(GateError::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("redirect target must be an absolute path, got {value:?}"),
                });
            }
        }
        Ok(())
    }
}

/// Spinner text shown while a gate waits on its sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingMessages {
    pub auth: String,
    pub organization: String,
    pub section: String,
    pub subscription: String,
    pub elevated: String,
}

impl Default for LoadingMessages {
    fn default() -> Self {
        Self {
            auth: "Loading...".to_string(),
            organization: "Loading organization...".to_string(),
            section: "Checking access...".to_string(),
            subscription: "Checking subscription...".to_string(),
            elevated: "Verifying permissions...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_redirect_rejected() {
        let routes = RouteConfig {
            pricing: "pricing".to_string(),
            ..RouteConfig::default()
        };
        let err = routes.validate().unwrap_err();
        assert!(err.to_string().contains("routes.pricing"));
    }
}
