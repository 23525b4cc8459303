#![deny(unreachable_pub)]

// Core modules
mod consts;
mod errors;
mod helpers;
mod prelude;
mod req;

// Feature modules
mod conditions;
mod identity;
mod join;
mod monitor;

// Re-exports
pub use conditions::{ConditionsClient, ConditionsResponse};
pub use consts::{LOCAL_API_URL, POLL_INTERVAL, PRODUCTION_API_URL, REQUEST_TIMEOUT, RETRY_BACKOFF};
pub use errors::{Error, HttpErrorKind};
pub use helpers::{cardinal_direction, normalize_degrees, BaseUrl};
pub use identity::{WalletHandle, WalletSession, WalletStatus, WalletWatch};
pub use join::{JoinClient, JoinController, JoinRequest, JoinResponse, JoinSink, JoinState};
pub use monitor::{
    ConditionsMonitor, ConditionsSnapshot, ConditionsSource, FeedPhase, MonitorConfig,
};
