//! Destination agents known to an external registry.

use std::sync::Arc;

/// Identifier of a destination agent.
///
/// Issued by the agent registry; this crate only compares and forwards it.
/// Cloning is cheap (`Arc<str>`).
///
/// # Example
///
/// ```
/// use capture_route::AgentId;
///
/// let a = AgentId::new("agent-7");
/// assert_eq!(a, AgentId::from("agent-7"));
/// assert_eq!(a.as_str(), "agent-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(Arc<str>);

impl AgentId {
    /// Creates a new agent ID from a string.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered destination agent.
///
/// Owned by the agent registry. The routing types only borrow slices of
/// these and never keep them past a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConnection {
    /// Registry identifier.
    pub id: AgentId,
    /// Display name, also used to match suggestions back to agents.
    pub name: String,
}

impl AgentConnection {
    /// Creates a connection record.
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
