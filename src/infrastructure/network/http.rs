// HTTP client utilities
use crate::domain::error::TtError;
use crate::infrastructure::config::Config;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Create the shared HTTP client with proxy and timeout taken from config
pub fn create_client(config: &Config) -> Result<Client, TtError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(config.backend.remote.timeout_secs))
        .user_agent(concat!("tt/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy) = config.http_proxy.as_deref().filter(|p| !p.is_empty()) {
        let proxy = Proxy::all(proxy)
            .map_err(|e| TtError::Config(format!("Invalid http_proxy '{}': {}", proxy, e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

// RFC 3986 unreserved characters pass through, everything else is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode `text` for use inside a URL path segment or query value.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Substitute `{text}` in a URL template with the percent-encoded query.
pub fn fill_template(template: &str, text: &str) -> String {
    template.replace("{text}", &encode_component(text))
}
