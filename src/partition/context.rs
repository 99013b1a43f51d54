//! Partition Context
//!
//! One context exists per partition and lives as long as the partition.
//! It is shared by reference with every step; steps agree among themselves
//! how it is mutated. The orchestrator only reads the partition id for logs.

/// Shared partition state handed to every step.
pub trait PartitionContext: Send + Sync + 'static {
    /// Identifier of the partition, used in logs and reports
    fn partition_id(&self) -> u32;
}
