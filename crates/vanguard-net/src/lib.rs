//! Distributed stepping for VANGUARD.
//!
//! Partitions entities across worker processes that each own their local
//! subset; the coordinator drives step boundaries through a barrier over
//! a framed Unix-socket protocol.

pub mod barrier;
pub mod coordinator;
pub mod envelope;
pub mod worker;

pub use barrier::StepBarrier;
pub use coordinator::{partition_round_robin, Coordinator};
pub use envelope::{Envelope, MessageType, NetError};
