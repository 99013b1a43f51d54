//! Step Chains
//!
//! The ordered step sequences installed for each role.
//! Leader and Follower are configured once at construction;
//! Inactive always uses the empty chain. Chains are never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use super::role::PartitionRole;
use super::step::{SharedStep, Step};

/// Immutable ordered sequence of steps for one role
pub struct StepChain<C> {
    steps: Arc<[SharedStep<C>]>,
}

impl<C> StepChain<C> {
    /// Create a chain from steps in installation order.
    pub fn new(steps: Vec<SharedStep<C>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    /// The empty chain, used for Inactive.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Steps in installation order
    pub fn steps(&self) -> &[SharedStep<C>] {
        &self.steps
    }

    /// Number of steps in the chain
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in installation order
    pub fn names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name().to_string()).collect()
    }
}

impl<C> Clone for StepChain<C> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<C> Default for StepChain<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> fmt::Debug for StepChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter().map(|s| s.name())).finish()
    }
}

/// Chains for every role of a partition
pub struct StepChains<C> {
    leader: StepChain<C>,
    follower: StepChain<C>,
    inactive: StepChain<C>,
}

impl<C> StepChains<C> {
    /// Create chains from the leader and follower step sequences.
    pub fn new(leader: Vec<SharedStep<C>>, follower: Vec<SharedStep<C>>) -> Self {
        Self {
            leader: StepChain::new(leader),
            follower: StepChain::new(follower),
            inactive: StepChain::empty(),
        }
    }

    /// Start building chains step by step.
    pub fn builder() -> StepChainsBuilder<C> {
        StepChainsBuilder::new()
    }

    /// Chain installed when becoming `role`
    pub fn for_role(&self, role: PartitionRole) -> &StepChain<C> {
        match role {
            PartitionRole::Leader => &self.leader,
            PartitionRole::Follower => &self.follower,
            PartitionRole::Inactive => &self.inactive,
        }
    }

    /// Leader chain
    pub fn leader(&self) -> &StepChain<C> {
        &self.leader
    }

    /// Follower chain
    pub fn follower(&self) -> &StepChain<C> {
        &self.follower
    }
}

impl<C> fmt::Debug for StepChains<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepChains")
            .field("leader", &self.leader)
            .field("follower", &self.follower)
            .finish()
    }
}

/// Builder for [`StepChains`]
pub struct StepChainsBuilder<C> {
    leader: Vec<SharedStep<C>>,
    follower: Vec<SharedStep<C>>,
}

impl<C> StepChainsBuilder<C> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            leader: Vec::new(),
            follower: Vec::new(),
        }
    }

    /// Append a step to the leader chain
    pub fn leader(mut self, step: impl Step<C> + 'static) -> Self {
        self.leader.push(Arc::new(step));
        self
    }

    /// Append an already shared step to the leader chain
    pub fn leader_shared(mut self, step: SharedStep<C>) -> Self {
        self.leader.push(step);
        self
    }

    /// Append a step to the follower chain
    pub fn follower(mut self, step: impl Step<C> + 'static) -> Self {
        self.follower.push(Arc::new(step));
        self
    }

    /// Append an already shared step to the follower chain
    pub fn follower_shared(mut self, step: SharedStep<C>) -> Self {
        self.follower.push(step);
        self
    }

    /// Build the chains
    pub fn build(self) -> StepChains<C> {
        StepChains::new(self.leader, self.follower)
    }
}

impl<C> Default for StepChainsBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
