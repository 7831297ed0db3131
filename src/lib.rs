pub mod allowlist;
pub mod api;
pub mod cmd;
pub mod envconfig;
pub mod error;
pub mod format;
pub mod gate;
pub mod message;
pub mod middleware;
pub mod server;

pub use allowlist::{Allowlist, ALLOW_ALL_PATTERN};
pub use api::{Client, DEFAULT_MODEL};
pub use error::{BridgeError, Result};
pub use gate::AuthorizationGate;
pub use message::{BridgeRequest, DomainList, ReplyEnvelope, RequestOptions};
pub use server::AppState;
