//! Partition Role State Machine
//!
//! States: Inactive, Leader, Follower, Transitioning.
//! - Any state moves to Transitioning when a transition starts
//! - Transitioning moves to the target role once every step is open
//! - A failed close or install leaves the partition Transitioning;
//!   only a later request resolves it
//!
//! There is no timer-driven retry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role a partition can be asked to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionRole {
    /// Installs the leader chain
    Leader,

    /// Installs the follower chain
    Follower,

    /// Installs nothing; tears everything down
    Inactive,
}

impl PartitionRole {
    /// Get role name for observability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Follower => "follower",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PartitionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable role state of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    /// No steps are open
    Inactive,

    /// Leader chain is fully open
    Leader,

    /// Follower chain is fully open
    Follower,

    /// A transition to `target` is running, or failed part way
    Transitioning {
        /// Role being installed
        target: PartitionRole,
    },
}

impl RoleState {
    /// Initial state: nothing open.
    pub fn new() -> Self {
        Self::Inactive
    }

    /// Enter Transitioning. Valid from any state.
    pub fn begin(self, target: PartitionRole) -> Self {
        Self::Transitioning { target }
    }

    /// Settle into the target role after a fully successful transition.
    ///
    /// Outside Transitioning this is a no-op.
    pub fn complete(self) -> Self {
        match self {
            Self::Transitioning { target } => Self::settled(target),
            settled => settled,
        }
    }

    /// Settled state for a role
    pub fn settled(role: PartitionRole) -> Self {
        match role {
            PartitionRole::Leader => Self::Leader,
            PartitionRole::Follower => Self::Follower,
            PartitionRole::Inactive => Self::Inactive,
        }
    }

    /// Check if a transition is running or stuck.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }

    /// Check if this is Leader.
    pub fn is_leader(&self) -> bool {
        matches!(self, Self::Leader)
    }

    /// Check if this is Follower.
    pub fn is_follower(&self) -> bool {
        matches!(self, Self::Follower)
    }

    /// Check if this is Inactive.
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    /// Settled role, if not transitioning
    pub fn role(&self) -> Option<PartitionRole> {
        match self {
            Self::Leader => Some(PartitionRole::Leader),
            Self::Follower => Some(PartitionRole::Follower),
            Self::Inactive => Some(PartitionRole::Inactive),
            Self::Transitioning { .. } => None,
        }
    }

    /// Target of the running transition
    pub fn target(&self) -> Option<PartitionRole> {
        match self {
            Self::Transitioning { target } => Some(*target),
            _ => None,
        }
    }

    /// Get state name for observability.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Leader => "leader",
            Self::Follower => "follower",
            Self::Transitioning { .. } => "transitioning",
        }
    }
}

impl Default for RoleState {
    fn default() -> Self {
        Self::new()
    }
}
