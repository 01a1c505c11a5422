use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use url::Url;

use crate::error::TransportError;

/// A form-encoded POST request.
#[derive(Clone, Debug)]
pub struct FormPost {
    pub url: Url,
    pub headers: HeaderMap,
    pub fields: Vec<(&'static str, String)>,
}

impl FormPost {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }
}

/// A response whose body has been read to completion.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The one capability the purge job needs from an HTTP stack.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn post_form(&self, request: FormPost) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl HttpSender for reqwest::Client {
    async fn post_form(&self, request: FormPost) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        let response = self
            .post(request.url)
            .headers(request.headers)
            .form(&request.fields)
            .send()
            .await
            .map_err(|error| TransportError::new(url.as_str(), error))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| TransportError::new(url.as_str(), error))?;

        Ok(HttpResponse { status, body })
    }
}
