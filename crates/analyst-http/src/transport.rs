//! Shared HTTP plumbing for the service clients

use crate::config::ClientConfig;
use crate::error::Result;
use analyst_core::ServiceError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// reqwest client bound to a service base URL
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    base: Url,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base: config.base()?,
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Base URL with `path` appended, keeping any prefix of the base path
    pub(crate) fn endpoint(&self, path: &str) -> std::result::Result<Url, ServiceError> {
        self.endpoint_with(path, None)
    }

    /// Like [`Transport::endpoint`], plus one percent-encoded trailing segment
    pub(crate) fn endpoint_with(
        &self,
        path: &str,
        segment: Option<&str>,
    ) -> std::result::Result<Url, ServiceError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ServiceError::Unreachable(format!("{} cannot be used as a base URL", self.base))
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|part| !part.is_empty()));
            if let Some(segment) = segment {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Send a request and check its status
    ///
    /// Non-2xx answers become [`ServiceError::Rejected`] carrying the server's
    /// `error` message, or `fallback` when it sent none.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> std::result::Result<Response, ServiceError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::Rejected {
            status: Some(status.as_u16()),
            message: rejection_message(&body, fallback),
        })
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> std::result::Result<T, ServiceError> {
        let response = self.send(request, fallback).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        serde_json::from_str(&body).map_err(|e| ServiceError::Rejected {
            status: Some(status),
            message: format!("Unexpected response from service: {e}"),
        })
    }
}

/// Server-provided `{"error": "..."}` message, if any
pub(crate) fn rejection_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    let reason = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ServiceError::Unreachable(format!("{reason}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        let config = ClientConfig::builder()
            .base_url(base)
            .use_system_proxy(false)
            .build()
            .unwrap();
        Transport::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let t = transport("http://localhost:5000");
        assert_eq!(t.endpoint("/companies").unwrap().as_str(), "http://localhost:5000/companies");

        let t = transport("http://localhost:5000/api/");
        assert_eq!(
            t.endpoint("/upload-json").unwrap().as_str(),
            "http://localhost:5000/api/upload-json"
        );
    }

    #[test]
    fn test_endpoint_encodes_segment() {
        let t = transport("http://localhost:5000");
        assert_eq!(
            t.endpoint_with("/evaluate", Some("BRK B")).unwrap().as_str(),
            "http://localhost:5000/evaluate/BRK%20B"
        );
        assert_eq!(
            t.endpoint_with("/evaluate", Some("A/B")).unwrap().as_str(),
            "http://localhost:5000/evaluate/A%2FB"
        );
    }

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message(r#"{"error": "Stock not found"}"#, "Evaluation failed"),
            "Stock not found"
        );
        assert_eq!(rejection_message("<h1>Server Error</h1>", "Upload failed"), "Upload failed");
        assert_eq!(rejection_message(r#"{"error": ""}"#, "Upload failed"), "Upload failed");
        assert_eq!(rejection_message(r#"{"message": "ok"}"#, "Upload failed"), "Upload failed");
    }
}
