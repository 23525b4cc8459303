//! Write-side client for the oracle's registration endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{prelude::*, req::HttpClient, BaseUrl, Error};

/// Body posted to the join endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JoinRequest {
    pub address: String,
}

/// Acknowledgment from the join endpoint.
///
/// `data` is deliberately untyped: the oracle attaches free-form detail
/// (transaction info, membership records) that callers display as-is.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct JoinResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct JoinClient {
    pub http_client: HttpClient,
}

impl JoinClient {
    pub fn new(client: Option<Client>, base_url: Option<BaseUrl>) -> JoinClient {
        JoinClient {
            http_client: HttpClient::new(client, base_url),
        }
    }

    /// Register an address with the oracle.
    ///
    /// A 2xx response with `success: false` is still a failure; the server
    /// message travels in [`Error::JoinRejected`].
    pub async fn join(&self, address: &str) -> Result<JoinResponse> {
        let body = serde_json::to_string(&JoinRequest {
            address: address.to_string(),
        })
        .map_err(|e| Error::JsonParse(e.to_string()))?;

        let text = self.http_client.post("/join", body).await?;
        let ack: JoinResponse =
            serde_json::from_str(&text).map_err(|e| Error::JsonParse(e.to_string()))?;

        if !ack.success {
            return Err(Error::JoinRejected {
                message: ack
                    .message
                    .unwrap_or_else(|| "registration was not accepted".to_string()),
            });
        }
        Ok(ack)
    }
}
