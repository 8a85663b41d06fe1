//! Thin wrapper over reqwest shared by every upstream client: one GET (or
//! form POST), optional auth, typed failure on a non-success status, JSON or
//! raw bytes out.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::gallery::GalleryError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map a transport failure onto the gallery error taxonomy: a 404 means the
/// upstream has no such post, anything else is a network problem.
pub fn gallery_error(err: TransportError) -> GalleryError {
    match err.status() {
        Some(StatusCode::NOT_FOUND) => GalleryError::NotFound(err.to_string()),
        _ => GalleryError::Network(err.to_string()),
    }
}

/// Parameters for one request. Owned strings keep the call sites simple;
/// these are built per request and dropped right after.
#[derive(Debug, Default)]
pub struct RequestSpec {
    pub basic_auth: Option<(String, String)>,
    pub bearer: Option<String>,
    pub headers: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
}

#[derive(Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        spec: RequestSpec,
    ) -> Result<T, TransportError> {
        let response = self.send(url, spec).await?;
        response.json().await.map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn get_bytes(&self, url: &str, spec: RequestSpec) -> Result<Vec<u8>, TransportError> {
        let response = self.send(url, spec).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;
        let response = Self::check_status(url, response)?;
        response.json().await.map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn send(
        &self,
        url: &str,
        spec: RequestSpec,
    ) -> Result<reqwest::Response, TransportError> {
        let mut request = self.client.get(url);
        if let Some((username, password)) = &spec.basic_auth {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(token) = &spec.bearer {
            request = request.bearer_auth(token);
        }
        for (name, value) in &spec.headers {
            request = request.header(*name, value);
        }
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }

        let response = request.send().await.map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;
        Self::check_status(url, response)
    }

    fn check_status(
        url: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}
