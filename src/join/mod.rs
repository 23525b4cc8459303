mod controller;
mod join_client;
mod sink;

pub use controller::{JoinController, JoinState};
pub use join_client::{JoinClient, JoinRequest, JoinResponse};
pub use sink::JoinSink;
