//! Core data models for the battle-log analyzer.

mod attack;
mod deployment;
mod event;
mod guild;
mod ids;
mod stats;
mod summary;

pub use attack::*;
pub use deployment::*;
pub use event::*;
pub use guild::*;
pub use ids::*;
pub use stats::*;
pub use summary::*;
