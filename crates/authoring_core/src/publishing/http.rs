//! `reqwest` blocking transport.

use crate::publishing::transport::{
    HttpMethod, HttpRequest, HttpResponse, PublishingTransport, TransportError,
};
use reqwest::blocking::Client;
use reqwest::Method;
use std::time::Duration;

/// Production transport backed by a shared blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps a caller-configured client (timeouts, proxies, TLS).
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError(err.to_string()))?;
        Ok(Self::new(client))
    }
}

impl PublishingTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .map_err(|err| TransportError(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| TransportError(err.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
