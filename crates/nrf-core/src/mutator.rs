//! Link and route state transitions.
//!
//! A bounce runs in three strictly ordered phases:
//!
//! ```text
//!   disable (one task per target, all joined)
//!       → wait `downtime` once (cancellable)
//!           → enable (one task per target, all joined)
//! ```
//!
//! Disabling is the privileged step: a failure there is fatal. Enabling is
//! best-effort so that one stubborn interface never blocks the rest from
//! being restored.
//!
//! A configured default gateway survives flushes: whenever targets are put
//! back into service the `default via` route is reinstalled if it went
//! missing.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use ipnet::Ipv4Net;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::backend::NetworkBackend;
use crate::error::FatalError;
use crate::types::{BounceMode, Member, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceOutcome {
    /// Targets were disabled, held down for the full downtime, and restored.
    Completed,
    /// Shutdown was requested during the downtime; targets are still down.
    Interrupted,
}

#[derive(Clone)]
pub struct Mutator {
    backend: Arc<dyn NetworkBackend>,
    mode: BounceMode,
    gateway: Option<Ipv4Addr>,
}

impl Mutator {
    pub fn new(backend: Arc<dyn NetworkBackend>, mode: BounceMode) -> Self {
        Self {
            backend,
            mode,
            gateway: None,
        }
    }

    /// Install `default via gateway` during [`setup`](Self::setup) and keep
    /// it installed across bounces and restores.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn mode(&self) -> BounceMode {
        self.mode
    }

    pub fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    /// Take `targets` out of service for `downtime`, then restore them.
    pub async fn bounce(
        &self,
        subnet: &Ipv4Net,
        targets: &[Member],
        downtime: Duration,
        shutdown: &CancellationToken,
    ) -> Result<BounceOutcome, FatalError> {
        if targets.is_empty() {
            return Ok(BounceOutcome::Completed);
        }
        if !downtime.is_zero() {
            info!(
                interfaces = %join_names(targets),
                subnet = %subnet,
                downtime = ?downtime,
                mode = %self.mode,
                "bouncing"
            );
        }

        if let Err(e) = self.disable_all(targets).await {
            error!(subnet = %subnet, error = %e, "disable failed, restoring targets");
            self.enable_all(targets).await;
            self.reinstate_gateway().await;
            return Err(e);
        }

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!(subnet = %subnet, "bounce interrupted by shutdown");
                return Ok(BounceOutcome::Interrupted);
            }
            _ = tokio::time::sleep(downtime) => {}
        }

        self.enable_all(targets).await;
        self.reinstate_gateway().await;
        Ok(BounceOutcome::Completed)
    }

    /// Non-disruptive initial state: every link up, in route mode every host
    /// route (re)installed, then the configured default gateway.
    pub async fn setup(&self, members: &[Member]) -> Result<(), FatalError> {
        for member in members {
            self.backend
                .set_link_up(&member.interface)
                .await
                .map_err(|source| FatalError::LinkUp {
                    interface: member.interface.clone(),
                    source,
                })?;
        }
        if self.mode == BounceMode::Route {
            self.restore_members(members).await;
        }
        if let Some(gateway) = self.gateway {
            self.set_default_gateway(gateway).await?;
        }
        Ok(())
    }

    /// Zero-downtime, best-effort restoration. Safe to repeat.
    pub async fn restore(&self, members: &[Member]) {
        self.restore_members(members).await;
        self.reinstate_gateway().await;
    }

    /// Replace the default route with one via `gateway`.
    pub async fn set_default_gateway(&self, gateway: Ipv4Addr) -> Result<(), FatalError> {
        let existing = self.backend.routes(None).await;
        if let Some(route) = existing.iter().find(|r| r.is_default())
            && let Err(e) = self.backend.delete_route(route).await
        {
            trace!(route = %route, error = %e, "failed to delete default route (ignored)");
        }
        self.backend
            .add_route(&Route::default_via(gateway))
            .await
            .map_err(|source| FatalError::Gateway { gateway, source })?;
        info!(gateway = %gateway, "default gateway set");
        Ok(())
    }

    /// Re-add the configured default route if a flush removed it.
    async fn reinstate_gateway(&self) {
        let Some(gateway) = self.gateway else {
            return;
        };
        let present = self
            .backend
            .routes(None)
            .await
            .iter()
            .any(|r| r.is_default() && r.gateway == Some(gateway));
        if present {
            return;
        }
        match self.backend.add_route(&Route::default_via(gateway)).await {
            Ok(()) => info!(gateway = %gateway, "default gateway reinstated"),
            Err(e) => warn!(gateway = %gateway, error = %e, "failed to reinstate default gateway"),
        }
    }

    async fn restore_members(&self, members: &[Member]) {
        let mut set = JoinSet::new();
        for member in members {
            set.spawn(restore_one(self.backend.clone(), self.mode, member.clone()));
        }
        join_best_effort(set).await;
    }

    async fn disable_all(&self, targets: &[Member]) -> Result<(), FatalError> {
        let mut set = JoinSet::new();
        for member in targets {
            set.spawn(disable(
                self.backend.clone(),
                self.mode,
                member.interface.clone(),
            ));
        }
        // Join every task even after a failure so nothing is still mutating
        // when the caller moves on.
        let mut first_err = None;
        while let Some(joined) = set.join_next().await {
            let result = joined.map_err(FatalError::from).and_then(|r| r);
            if let Err(e) = result
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    async fn enable_all(&self, targets: &[Member]) {
        let mut set = JoinSet::new();
        for member in targets {
            set.spawn(enable(self.backend.clone(), self.mode, member.clone()));
        }
        join_best_effort(set).await;
    }
}

fn join_names(members: &[Member]) -> String {
    members
        .iter()
        .map(|m| m.interface.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn join_best_effort(mut set: JoinSet<()>) {
    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "restore task panicked");
        }
    }
}

async fn disable(
    backend: Arc<dyn NetworkBackend>,
    mode: BounceMode,
    interface: String,
) -> Result<(), FatalError> {
    match mode {
        BounceMode::Link => backend
            .set_link_down(&interface)
            .await
            .map_err(|source| FatalError::LinkDown { interface, source }),
        BounceMode::Route => flush_routes(backend.as_ref(), &interface).await,
    }
}

/// Delete every IPv4 route bound to `interface`, including ones this tool
/// did not install. Only a permission failure is reported.
async fn flush_routes(backend: &dyn NetworkBackend, interface: &str) -> Result<(), FatalError> {
    for route in backend.routes(Some(interface)).await {
        match backend.delete_route(&route).await {
            Ok(()) => trace!(route = %route, "route deleted"),
            Err(source) if source.is_permission() => {
                return Err(FatalError::RouteDelete {
                    interface: interface.to_string(),
                    source,
                });
            }
            Err(e) => trace!(route = %route, error = %e, "route delete failed (ignored)"),
        }
    }
    Ok(())
}

async fn enable(backend: Arc<dyn NetworkBackend>, mode: BounceMode, member: Member) {
    match mode {
        BounceMode::Link => {
            if let Err(e) = backend.set_link_up(&member.interface).await {
                warn!(interface = %member.interface, error = %e, "failed to bring link up");
            }
        }
        BounceMode::Route => {
            let Some(peer) = member.peer else {
                warn!(interface = %member.interface, "no peer address, skipping route");
                return;
            };
            let route = Route::host(peer, &member.interface);
            if let Err(e) = backend.add_route(&route).await {
                warn!(route = %route, error = %e, "failed to add route");
            }
        }
    }
}

async fn restore_one(backend: Arc<dyn NetworkBackend>, mode: BounceMode, member: Member) {
    if mode == BounceMode::Route
        && let Err(e) = flush_routes(backend.as_ref(), &member.interface).await
    {
        warn!(interface = %member.interface, error = %e, "failed to flush routes");
    }
    enable(backend, mode, member).await;
}
