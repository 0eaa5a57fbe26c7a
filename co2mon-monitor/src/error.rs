use thiserror::Error;

/// Errors that stop the listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),

    #[error("Invalid match rule: {0}")]
    MatchRule(String),

    #[error("Signal subscription closed")]
    SubscriptionClosed,

    #[error("Failed to write reading: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias using [`ListenerError`].
pub type Result<T> = std::result::Result<T, ListenerError>;
