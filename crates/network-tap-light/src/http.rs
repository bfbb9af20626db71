//! `reqwest`-backed fetch capability.

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::fetch::{Fetch, FetchError, FetchRequest, FetchResponse};

#[derive(Clone, Debug, Default)]
pub struct HttpFetch {
    client: Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|err| FetchError::InvalidRequest(err.to_string()))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(FetchResponse {
            url,
            status,
            headers,
            body,
        })
    }
}
