use std::time::Duration;

pub const PRODUCTION_API_URL: &str = "http://167.172.135.195:8000";
pub const LOCAL_API_URL: &str = "http://localhost:8000";

/// Interval between successful condition fetches.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Delay before retrying a failed condition fetch.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Transport-level timeout applied to the default HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
