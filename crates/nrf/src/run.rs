use std::net::Ipv4Addr;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use nrf_core::{BounceMode, Inventory, Mutator, NetworkBackend, Scheduler, ShutdownHandler};
use nrf_iproute::{IpRouteBackend, Privilege};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config;
use crate::error::{NrfError, NrfResult};
use crate::signal::ShutdownSignals;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bring interfaces up (and install host routes in route mode), then exit
    #[arg(long, visible_alias = "routes")]
    pub setup_only: bool,
    /// What a bounce takes out of service
    #[arg(long, value_enum, default_value_t = Mode::Route)]
    pub mode: Mode,
    /// Seed for target selection; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Replace the default route with one via this gateway during setup
    #[arg(long)]
    pub gateway: Option<Ipv4Addr>,
    /// Run `ip` through `sudo -n` instead of requiring root
    #[arg(long)]
    pub sudo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Bring links down and up
    Link,
    /// Delete and reinstall host routes toward synthetic peers
    Route,
}

impl From<Mode> for BounceMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Link => BounceMode::Link,
            Mode::Route => BounceMode::Route,
        }
    }
}

/// Discover, set up, then bounce until SIGINT/SIGTERM.
pub async fn run(args: RunArgs) -> NrfResult<()> {
    let privilege = privilege(args.sudo)?;
    let backend: Arc<dyn NetworkBackend> = Arc::new(IpRouteBackend::new(privilege));
    let mode = BounceMode::from(args.mode);

    let inventory = Arc::new(build_inventory(backend.as_ref(), mode).await);
    for (subnet, members) in inventory.iter() {
        let names: Vec<_> = members.iter().map(|m| m.interface.as_str()).collect();
        info!(subnet = %subnet, interfaces = %names.join(", "), "subnet");
    }

    // Setup flushes routes before reinstalling them, so a signal must not
    // take the default action from here on.
    let shutdown = CancellationToken::new();
    ShutdownSignals::install()?.spawn_listener(shutdown.clone());

    let mut mutator = Mutator::new(backend, mode);
    if let Some(gateway) = args.gateway {
        mutator = mutator.with_gateway(gateway);
    }
    mutator.setup(&inventory.all_members()).await?;
    if args.setup_only {
        info!(gateway = ?mutator.gateway(), "setup complete");
        return Ok(());
    }

    let downtime = config::downtime_from_env();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, downtime = ?downtime, "starting bounce loop");

    let handler = ShutdownHandler::new(inventory.clone(), mutator.clone());
    let mut scheduler = Scheduler::new(inventory, mutator, downtime, StdRng::seed_from_u64(seed));
    scheduler.run(shutdown).await?;

    handler.restore_all().await;
    Ok(())
}

async fn build_inventory(backend: &dyn NetworkBackend, mode: BounceMode) -> Inventory {
    let inventory = nrf_core::discover(backend).await;
    match mode {
        BounceMode::Route => inventory.with_peers(),
        BounceMode::Link => inventory,
    }
}

fn privilege(sudo: bool) -> NrfResult<Privilege> {
    if sudo {
        return Ok(Privilege::Sudo);
    }
    if !nix::unistd::geteuid().is_root() {
        return Err(NrfError::Privilege(
            "changing link and route state needs root (or pass --sudo)".into(),
        ));
    }
    Ok(Privilege::User)
}
