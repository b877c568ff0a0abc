//! Vendor request headers.
//!
//! The upstream sits behind bot mitigation that expects a desktop Chrome
//! fingerprint plus the web app's origin/referer. Header sets differ per
//! operation only in the streaming/model/source flags.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use novaapp_types::{Credential, ProxyError, UpstreamEndpoints};

/// Fixed browser User-Agent presented to the vendor.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
const SEC_CH_UA: &str = r#""Google Chrome";v="141", "Not?A_Brand";v="8", "Chromium";v="141""#;

/// The three upstream calls that carry credential headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOperation {
    ChatSubmit,
    ImageSubmit,
    ImagePoll,
}

impl UpstreamOperation {
    fn accept(self) -> &'static str {
        match self {
            Self::ChatSubmit => "text/event-stream",
            Self::ImageSubmit | Self::ImagePoll => "*/*",
        }
    }
}

/// Stateless header factory; output depends only on its inputs.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    origin: String,
    referer: String,
}

impl HeaderBuilder {
    pub fn new(origin: impl Into<String>, referer: impl Into<String>) -> Self {
        Self { origin: origin.into(), referer: referer.into() }
    }

    pub fn from_endpoints(endpoints: &UpstreamEndpoints) -> Self {
        Self::new(endpoints.origin.clone(), endpoints.referer.clone())
    }

    /// Headers for `operation`. `model_id` is ignored for polling.
    pub fn build(
        &self,
        operation: UpstreamOperation,
        credential: &Credential,
        model_id: u32,
    ) -> Result<HeaderMap, ProxyError> {
        let mut headers = self.browser_headers()?;
        headers.insert(header::ACCEPT, HeaderValue::from_static(operation.accept()));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));

        insert_dynamic(&mut headers, "x_token", &credential.token)?;
        insert_dynamic(&mut headers, "x_user_id", &credential.user_id)?;
        headers.insert(HeaderName::from_static("x_platform"), HeaderValue::from_static("web"));
        headers.insert(HeaderName::from_static("x_pr"), HeaderValue::from_static("true"));

        match operation {
            UpstreamOperation::ChatSubmit => {
                headers.insert(HeaderName::from_static("x_stream"), HeaderValue::from_static("true"));
                headers.insert(HeaderName::from_static("x_version"), HeaderValue::from_static("2"));
                headers.insert(HeaderName::from_static("x_model"), HeaderValue::from(model_id));
            },
            UpstreamOperation::ImageSubmit => {
                headers.insert(HeaderName::from_static("x_stream"), HeaderValue::from_static("false"));
                headers.insert(HeaderName::from_static("x_model"), HeaderValue::from(model_id));
            },
            UpstreamOperation::ImagePoll => {
                headers.insert(HeaderName::from_static("x_source"), HeaderValue::from_static("2"));
            },
        }

        Ok(headers)
    }

    /// Headers for storage metadata and asset downloads.
    pub fn storage(&self, credential: &Credential) -> Result<HeaderMap, ProxyError> {
        let mut headers = self.browser_headers()?;
        insert_dynamic(&mut headers, "authorization", &format!("Firebase {}", credential.token))?;
        Ok(headers)
    }

    fn browser_headers(&self) -> Result<HeaderMap, ProxyError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        insert_dynamic(&mut headers, "origin", &self.origin)?;
        insert_dynamic(&mut headers, "referer", &self.referer)?;
        Ok(headers)
    }
}

fn insert_dynamic(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), ProxyError> {
    let value = HeaderValue::from_str(value).map_err(|e| ProxyError::Internal {
        message: format!("invalid value for header {}: {}", name, e),
    })?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
