//! JSON-over-HTTP fetch helper shared by outbound clients.

use serde::de::DeserializeOwned;

use crate::CoreError;

/// GET `url` and decode the body as JSON. Non-2xx responses are errors.
pub async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, CoreError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| CoreError::Network(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CoreError::Status { status: status.as_u16(), url: url.to_string() });
    }
    resp.json::<T>()
        .await
        .map_err(|e| CoreError::Parse(e.to_string()))
}
