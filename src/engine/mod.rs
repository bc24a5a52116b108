//! The dispatch boundary.
//!
//! Input sources run on their own threads and only hold a [`Dispatcher`].
//! Everything they send lands in one bounded channel and is applied in
//! arrival order by a single [`Performer`], which owns the
//! [`PolyphonyManager`](crate::synth::PolyphonyManager) and its backend.

pub mod command;
pub mod dispatch;
pub mod performer;

pub use command::Command;
pub use dispatch::{command_channel, Dispatcher};
pub use performer::{PerformanceEvent, PerformanceReport, Performer};
