use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{LocationId, RawDocument};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:126.0) Gecko/20100101 Firefox/126.0";

/// One retrieval of one location's results page.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, location: &LocationId) -> Result<RawDocument, PipelineError>;
}

/// Fetches pages over HTTP, posing as a desktop browser. The results site
/// throttles or rejects requests without these headers.
pub struct HttpFetcher {
    client: Client,
    config: Config,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, location: &LocationId) -> Result<RawDocument, PipelineError> {
        let url = self.config.url_for(location);
        debug!("GET {}", url);

        // The site expects navigation from its own pages.
        let referer = HeaderValue::from_str(&url).map_err(|e| PipelineError::transport(location, e))?;

        let response = self
            .client
            .get(&url)
            .header(header::REFERER, referer)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| PipelineError::transport(location, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::transport(location, e))?;

        Ok(RawDocument(body))
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert("priority", HeaderValue::from_static("u=1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert("sec-gpc", HeaderValue::from_static("1"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}
