/// Failure reported by one of the OS network collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

impl NetError {
    /// `true` for missing privilege or capability, which no retry can fix.
    pub fn is_permission(&self) -> bool {
        matches!(self, NetError::PermissionDenied(_))
    }
}

pub type Result<T> = std::result::Result<T, NetError>;

/// A mutation failure the process must not continue past.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("failed to bring {interface} down: {source}")]
    LinkDown {
        interface: String,
        #[source]
        source: NetError,
    },

    #[error("failed to bring {interface} up: {source}")]
    LinkUp {
        interface: String,
        #[source]
        source: NetError,
    },

    #[error("failed to delete route on {interface}: {source}")]
    RouteDelete {
        interface: String,
        #[source]
        source: NetError,
    },

    #[error("failed to set default gateway {gateway}: {source}")]
    Gateway {
        gateway: std::net::Ipv4Addr,
        #[source]
        source: NetError,
    },

    #[error("mutation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
