//! Entitlement checks
//!
//! The subscription system is external. Playback only asks a yes/no question
//! before starting restricted content.

use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Access rights a session can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Playback of tracks flagged premium
    PremiumContent,
}

/// Answers whether the current session holds a capability
///
/// Implementations must be side-effect free; the coordinator consults the
/// gate synchronously on every restricted action.
pub trait EntitlementGate: Send + Sync {
    /// Whether the session holds `capability`
    fn has_access(&self, capability: Capability) -> bool;

    /// Whether the session may play `track`
    fn can_play(&self, track: &Track) -> bool {
        !track.premium || self.has_access(Capability::PremiumContent)
    }
}

impl<F> EntitlementGate for F
where
    F: Fn(Capability) -> bool + Send + Sync,
{
    fn has_access(&self, capability: Capability) -> bool {
        self(capability)
    }
}

/// Fixed entitlements, e.g. from a decoded session token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEntitlements {
    /// Premium subscription active
    pub premium: bool,
}

impl StaticEntitlements {
    /// Session with premium access
    pub fn premium() -> Self {
        Self { premium: true }
    }

    /// Session on the free tier
    pub fn free() -> Self {
        Self { premium: false }
    }
}

impl EntitlementGate for StaticEntitlements {
    fn has_access(&self, capability: Capability) -> bool {
        match capability {
            Capability::PremiumContent => self.premium,
        }
    }
}
