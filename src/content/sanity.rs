//! Content API client
//!
//! Runs GROQ queries against the content API's HTTP query endpoint and
//! decodes the `{ "result": .. }` envelope into document types.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::{Footer, Header, ProductCopy};
use crate::config::SanityConfig;

/// Per-request timeout for content queries
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Latest header document, logo asset dereferenced
const HEADER_QUERY: &str = r#"*[_type == "header"][0] {
  storeName,
  logo { asset->{ url }, alt },
  logoHeight,
  navigation[] { name, href },
  marquee {
    enabled,
    text1 { enabled, content },
    text2 { enabled, content },
    text3 { enabled, content },
    linkUrl,
    pauseOnHover
  }
}"#;

/// Latest footer document, logo asset dereferenced
const FOOTER_QUERY: &str = r#"*[_type == "footer"][0] {
  title,
  logo { asset->{ url }, alt },
  logoWidth,
  sections[] { title, links[] { text, url } },
  contactInfo { phone, email },
  socialMedia {
    facebook { enabled, url },
    instagram { enabled, url },
    line { enabled, url },
    youtube { enabled, url },
    twitter { enabled, url }
  },
  copyright
}"#;

/// Copy document linked to a commerce product id
const PRODUCT_COPY_QUERY: &str =
    r#"*[_type == "productCopy" && productId == $productId][0]{tagline,longDescription}"#;

/// Errors that can occur when querying the content API
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Content API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Response envelope of the query endpoint
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// Client for the content API's query endpoint
#[derive(Clone)]
pub struct SanityClient {
    http_client: Client,
    /// Full query URL (allows override for testing)
    query_url: String,
    token: Option<String>,
    perspective: &'static str,
}

impl std::fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field("query_url", &self.query_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("perspective", &self.perspective)
            .finish()
    }
}

impl SanityClient {
    /// Creates a client for the configured project and dataset
    pub fn new(config: &SanityConfig) -> Result<Self, ContentError> {
        Self::with_query_url(config, config.query_url())
    }

    /// Creates a client that sends queries to `query_url` instead of the
    /// URL derived from `config`
    pub fn with_query_url(
        config: &SanityConfig,
        query_url: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            query_url: query_url.into(),
            token: config.token.clone(),
            perspective: config.perspective.as_str(),
        })
    }

    /// URL queries are sent to
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Runs `query` with `$name` parameters bound to string values
    ///
    /// # Returns
    /// * `Ok(Some(T))` - the query matched a document
    /// * `Ok(None)` - the query result was `null`
    /// * `Err(ContentError)` - transport, status or decoding failure
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, ContentError> {
        let query_params = build_query_params(query, self.perspective, params);

        let mut request = self.http_client.get(&self.query_url).query(&query_params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_result(&text)
    }

    /// Fetches the site header
    pub async fn header(&self) -> Result<Option<Header>, ContentError> {
        self.fetch(HEADER_QUERY, &[]).await
    }

    /// Fetches the site footer
    pub async fn footer(&self) -> Result<Option<Footer>, ContentError> {
        self.fetch(FOOTER_QUERY, &[]).await
    }

    /// Fetches the copy document for a commerce product
    pub async fn product_copy(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductCopy>, ContentError> {
        self.fetch(PRODUCT_COPY_QUERY, &[("productId", product_id)])
            .await
    }
}

/// Query-string pairs: the GROQ text, the perspective, and one `$name`
/// entry per parameter holding its JSON encoding
fn build_query_params(
    query: &str,
    perspective: &str,
    params: &[(&str, &str)],
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("query".to_string(), query.to_string()),
        ("perspective".to_string(), perspective.to_string()),
    ];
    pairs.extend(params.iter().map(|(name, value)| {
        (
            format!("${}", name),
            serde_json::Value::from(*value).to_string(),
        )
    }));
    pairs
}

fn parse_result<T: DeserializeOwned>(text: &str) -> Result<Option<T>, ContentError> {
    let envelope: QueryResponse<T> = serde_json::from_str(text)?;
    Ok(envelope.result)
}
