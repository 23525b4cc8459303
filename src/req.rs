use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{consts::REQUEST_TIMEOUT, prelude::*, BaseUrl, Error};

/// Error payload shapes the oracle is known to emit. Flask handlers answer
/// `{"error": ...}`, the join route `{"message": ...}`.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    pub client: Client,
    pub base_url: String,
}

async fn parse_response(response: Response) -> Result<String> {
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| Error::GenericRequest(e.to_string()))?;

    if status_code < 400 {
        return Ok(text);
    }

    // Prefer a diagnostic from the body over the raw text.
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .unwrap_or(text);

    if (400..500).contains(&status_code) {
        return Err(Error::client_error(status_code, None, message));
    }
    Err(Error::server_error(status_code, message))
}

impl HttpClient {
    pub fn new(client: Option<Client>, base_url: Option<BaseUrl>) -> HttpClient {
        let client = client.unwrap_or_else(|| {
            Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default()
        });
        let base_url = base_url.unwrap_or(BaseUrl::Production).get_url();
        HttpClient { client, base_url }
    }

    pub async fn get(&self, url_path: &'static str) -> Result<String> {
        let full_url = format!("{}{url_path}", self.base_url);
        let result = self
            .client
            .get(&full_url)
            .send()
            .await
            .map_err(|e| Error::GenericRequest(e.to_string()))?;
        parse_response(result).await
    }

    pub async fn post(&self, url_path: &'static str, data: String) -> Result<String> {
        let full_url = format!("{}{url_path}", self.base_url);
        let result = self
            .client
            .post(&full_url)
            .header("Content-Type", "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| Error::GenericRequest(e.to_string()))?;
        parse_response(result).await
    }
}
