use std::sync::Arc;

use tracing::info;

use crate::inventory::Inventory;
use crate::mutator::Mutator;

/// Puts every discovered interface back into service before the process exits.
pub struct ShutdownHandler {
    inventory: Arc<Inventory>,
    mutator: Mutator,
}

impl ShutdownHandler {
    pub fn new(inventory: Arc<Inventory>, mutator: Mutator) -> Self {
        Self { inventory, mutator }
    }

    /// Restore all interfaces, not only the ones bounced last.
    pub async fn restore_all(&self) {
        let members = self.inventory.all_members();
        info!(
            interfaces = members.len(),
            "exiting and leaving interfaces in a functional state"
        );
        self.mutator.restore(&members).await;
    }
}
