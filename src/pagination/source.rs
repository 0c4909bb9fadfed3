//! HTTP-backed page source

use super::driver::{PageResult, PageSource};
use super::params::RequestDescriptor;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use async_trait::async_trait;

/// Fetches pages over HTTP and decodes their records
#[derive(Debug)]
pub struct HttpPageSource<D = JsonDecoder> {
    client: HttpClient,
    decoder: D,
}

impl HttpPageSource<JsonDecoder> {
    /// Create a page source reading a JSON array at the document root
    pub fn new(client: HttpClient) -> Self {
        Self::with_decoder(client, JsonDecoder::new())
    }
}

impl<D: RecordDecoder> HttpPageSource<D> {
    /// Create a page source with a custom decoder
    pub fn with_decoder(client: HttpClient, decoder: D) -> Self {
        Self { client, decoder }
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl<D: RecordDecoder> PageSource for HttpPageSource<D> {
    async fn fetch_page(&self, path: &str, params: &RequestDescriptor) -> Result<PageResult> {
        let response = self.client.get_page(path, params).await?;
        let headers = response.headers().clone();

        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        let records = self.decoder.decode(&body)?;

        Ok(PageResult::new(records, headers))
    }
}
