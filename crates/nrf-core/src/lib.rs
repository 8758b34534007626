mod allocate;
mod backend;
mod classify;
mod error;
mod inventory;
mod mutator;
mod scheduler;
mod select;
mod shutdown;
#[cfg(test)]
mod testing;
mod types;

pub use allocate::allocate;
pub use backend::NetworkBackend;
pub use classify::{LOOPBACK_PREFIX, classify, discover};
pub use error::{FatalError, NetError, Result};
pub use inventory::Inventory;
pub use mutator::{BounceOutcome, Mutator};
pub use scheduler::{CycleOutcome, DEFAULT_DOWNTIME, Scheduler};
pub use select::{abandon_cycle, pick_targets, visit_order};
pub use shutdown::ShutdownHandler;
pub use types::{BounceMode, InterfaceInfo, Member, Route, RouteScope};
