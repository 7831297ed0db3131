use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failure kinds crossing the bridge. The `Display` text of each variant is
/// exactly what callers see in the `error` field of a reply envelope.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Unauthorized domain")]
    Unauthorized,

    #[error("Invalid domain format")]
    InvalidFormat,

    #[error("No active tab URL")]
    NoActiveTab,

    #[error("HTTP error! Status: {status}, Message: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("{message}")]
    Transport { message: String },

    #[error("Received no response from the bridge")]
    NoResponse,

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Failed to persist allowed domains: {message}")]
    Storage { message: String },
}
