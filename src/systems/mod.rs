//! Bevy systems and plugins
//!
//! - Cancellable background work: the delayed init and the filter pass
//! - Per-frame systems that drive them
//! - Plugin and system-set configuration

pub mod filter_task;
pub mod init_task;
pub mod lifecycle;
pub mod plugins;

pub use filter_task::{FilterStep, FilterTask};
pub use init_task::DelayedInit;
pub use lifecycle::{BuildingInitialized, FilterCompleted};
pub use plugins::{BuildingSets, BuildingSystems};
