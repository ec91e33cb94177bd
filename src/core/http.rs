use crate::error::Result;
use reqwest::blocking::Client;
use std::io::Read;
use tracing::debug;

const USER_AGENT: &str = concat!("vpm/", env!("CARGO_PKG_VERSION"));

/// Response whose headers have arrived but whose body is still unread
pub struct FetchResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: Box<dyn Read>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of HTTP GET responses
pub trait Fetcher {
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        debug!("GET {url}");

        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let content_length = response.content_length();

        debug!(status, content_length = ?content_length, "response headers received");

        Ok(FetchResponse {
            status,
            content_length,
            body: Box::new(response),
        })
    }
}
