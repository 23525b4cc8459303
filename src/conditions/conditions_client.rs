use reqwest::Client;

use crate::{
    conditions::response_structs::ConditionsResponse, prelude::*, req::HttpClient, BaseUrl, Error,
};

/// Read-only client for the oracle's condition feed.
#[derive(Debug, Clone)]
pub struct ConditionsClient {
    pub http_client: HttpClient,
}

impl ConditionsClient {
    pub fn new(client: Option<Client>, base_url: Option<BaseUrl>) -> ConditionsClient {
        ConditionsClient {
            http_client: HttpClient::new(client, base_url),
        }
    }

    /// Fetch the latest wind reading.
    pub async fn conditions(&self) -> Result<ConditionsResponse> {
        let text = self.http_client.get("/wind").await?;
        serde_json::from_str(&text).map_err(|e| Error::JsonParse(e.to_string()))
    }
}
