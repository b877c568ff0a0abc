use std::time::Duration;

use crate::error::AppResult;

/// Build the shared outbound HTTP client with the transport-level timeout.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout.max(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .build()?;
    Ok(client)
}
