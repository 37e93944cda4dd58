//! Outbound HTTP client construction

use crate::config::ProvidersConfig;
use crate::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// Build the HTTP client shared by one provider backend
///
/// Every request asks for JSON, carries the configured User-Agent and is
/// bounded by the configured timeout.
pub fn build_client(providers: &ProvidersConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(providers.user_agent.as_str())
        .default_headers(headers)
        .timeout(providers.timeout())
        .build()?;
    Ok(client)
}
