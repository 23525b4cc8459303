use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    join::join_client::{JoinClient, JoinResponse},
    prelude::*,
};

/// Trait for the registration endpoint.
/// Abstracts the join client to enable testing and mocking.
#[async_trait]
pub trait JoinSink: Send + Sync {
    /// Submit one registration for `address`.
    async fn join(&self, address: &str) -> Result<JoinResponse>;
}

#[async_trait]
impl JoinSink for JoinClient {
    async fn join(&self, address: &str) -> Result<JoinResponse> {
        JoinClient::join(self, address).await
    }
}

/// Blanket implementation so shared sinks can be handed to the controller.
#[async_trait]
impl<K: JoinSink + ?Sized> JoinSink for Arc<K> {
    async fn join(&self, address: &str) -> Result<JoinResponse> {
        (**self).join(address).await
    }
}
