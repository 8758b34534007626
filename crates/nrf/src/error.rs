#[derive(Debug, thiserror::Error)]
pub enum NrfError {
    #[error(transparent)]
    Fatal(#[from] nrf_core::FatalError),

    #[error("insufficient privilege: {0}")]
    Privilege(String),

    #[error("signal handler: {0}")]
    Signal(#[from] std::io::Error),
}

pub type NrfResult<T> = Result<T, NrfError>;
