//! The bounce control loop.
//!
//! Each cycle visits the subnets in a freshly shuffled order. For every
//! visited subnet a random non-empty subset of its interfaces is bounced,
//! after which the rest of the cycle may be abandoned (1 in 4) so coverage
//! across subnets is itself random. Bounces never overlap: at most one
//! subnet is degraded at any moment.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::FatalError;
use crate::inventory::Inventory;
use crate::mutator::{BounceOutcome, Mutator};
use crate::select::{abandon_cycle, pick_targets, visit_order};

/// Downtime used when none is configured.
pub const DEFAULT_DOWNTIME: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every subnet was visited.
    Finished,
    /// The cycle stopped early and the next one starts from scratch.
    Abandoned,
    /// Shutdown was requested.
    Interrupted,
}

pub struct Scheduler {
    inventory: Arc<Inventory>,
    mutator: Mutator,
    downtime: Duration,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(
        inventory: Arc<Inventory>,
        mutator: Mutator,
        downtime: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            inventory,
            mutator,
            downtime,
            rng,
        }
    }

    /// Run cycles until `shutdown` is cancelled.
    ///
    /// Returns `Ok(())` only on cancellation. Targets of an interrupted
    /// bounce are left for the shutdown handler to restore.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), FatalError> {
        if self.inventory.is_empty() {
            warn!("no IPv4 interfaces to bounce, idling until shutdown");
            shutdown.cancelled().await;
            return Ok(());
        }

        info!(
            subnets = self.inventory.len(),
            interfaces = self.inventory.interface_count(),
            downtime = ?self.downtime,
            mode = %self.mutator.mode(),
            "scheduler started"
        );

        let mut cycles: u64 = 0;
        loop {
            cycles += 1;
            match self.run_cycle(&shutdown).await? {
                CycleOutcome::Interrupted => {
                    info!(cycles, "scheduler stopped");
                    return Ok(());
                }
                outcome => debug!(cycle = cycles, ?outcome, "cycle done"),
            }
        }
    }

    /// One pass over the subnets.
    pub async fn run_cycle(
        &mut self,
        shutdown: &CancellationToken,
    ) -> Result<CycleOutcome, FatalError> {
        for subnet in visit_order(&self.inventory, &mut self.rng) {
            if shutdown.is_cancelled() {
                return Ok(CycleOutcome::Interrupted);
            }
            let targets = pick_targets(self.inventory.members(&subnet), &mut self.rng);
            let outcome = self
                .mutator
                .bounce(&subnet, &targets, self.downtime, shutdown)
                .await?;
            if outcome == BounceOutcome::Interrupted {
                return Ok(CycleOutcome::Interrupted);
            }
            if abandon_cycle(&mut self.rng) {
                return Ok(CycleOutcome::Abandoned);
            }
        }
        Ok(CycleOutcome::Finished)
    }
}
