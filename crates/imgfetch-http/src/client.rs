//! [`HttpClientPort`] implementation over `reqwest`.

use async_trait::async_trait;
use futures_util::StreamExt;
use imgfetch_core::{ByteStream, HeadMetadata, HttpClientPort, HttpPortError, HttpPortResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::config::HttpClientConfig;
use crate::error::{HttpError, HttpResult};

/// Production HTTP client.
///
/// Requests follow redirects and time out according to the config. Bodies
/// are never buffered; `stream_body` hands chunks through as they arrive.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client from the given configuration.
    pub fn new(config: &HttpClientConfig) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(HttpError::ClientBuild)?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> HttpResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttpClient {
    async fn head_metadata(&self, url: &Url) -> HttpPortResult<HeadMetadata> {
        debug!(url = %url, "HEAD");
        let response = self.send(self.client.head(url.clone()), url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(HeadMetadata { content_type })
    }

    async fn stream_body(&self, url: &Url) -> HttpPortResult<ByteStream> {
        debug!(url = %url, "GET");
        let response = self.send(self.client.get(url.clone()), url).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| HttpPortError::from(HttpError::from(e))));
        Ok(stream.boxed())
    }
}
