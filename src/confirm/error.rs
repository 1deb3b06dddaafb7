use thiserror::Error;

/// Errors talking to the confirmation broker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("Confirmation broker closed")]
    BrokerClosed,
    #[error("Confirmation broker dropped response channel")]
    BrokerDropped,
}
