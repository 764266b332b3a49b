//! Client-side access to the property endpoints.

use crate::error::FieldError;
use crate::model::{NewProperty, Property, PropertyId, PropertyPatch};
use crate::response::{Envelope, ErrorEnvelope, Pagination};
use crate::service::query::ListParams;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", api_message(.message, .errors))]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("response carried no data")]
    MissingData,
}

fn api_message(message: &str, errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return message.to_string();
    }
    let detail = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} ({})", message, detail)
}

/// One page of records plus the server's pagination block.
#[derive(Clone, Debug)]
pub struct Page {
    pub records: Vec<Property>,
    pub pagination: Pagination,
}

#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<Page, ClientError>;
    async fn get(&self, id: &PropertyId) -> Result<Property, ClientError>;
    async fn create(&self, new: &NewProperty) -> Result<Property, ClientError>;
    async fn update(&self, id: &PropertyId, patch: &PropertyPatch) -> Result<Property, ClientError>;
    async fn delete(&self, id: &PropertyId) -> Result<(), ClientError>;
}

/// `PropertyApi` over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpPropertyApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPropertyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        HttpPropertyApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a success envelope, or turn an error envelope into `ClientError::Api`.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Envelope<T>, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<Envelope<T>>().await?);
    }
    let body = resp.text().await?;
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(e) => Err(ClientError::Api {
            status: e.status_code,
            message: e.message,
            errors: e.errors,
        }),
        Err(_) => Err(ClientError::Api {
            status: status.as_u16(),
            message: if body.is_empty() { status.to_string() } else { body },
            errors: Vec::new(),
        }),
    }
}

fn data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    envelope.data.ok_or(ClientError::MissingData)
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn list(&self, params: &ListParams) -> Result<Page, ClientError> {
        let resp = self.client.get(self.url("/properties")).query(params).send().await?;
        let envelope = read_envelope::<Vec<Property>>(resp).await?;
        let pagination = envelope.pagination.clone().ok_or(ClientError::MissingData)?;
        Ok(Page {
            records: data(envelope)?,
            pagination,
        })
    }

    async fn get(&self, id: &PropertyId) -> Result<Property, ClientError> {
        let resp = self.client.get(self.url(&format!("/properties/{}", id))).send().await?;
        data(read_envelope(resp).await?)
    }

    async fn create(&self, new: &NewProperty) -> Result<Property, ClientError> {
        let resp = self.client.post(self.url("/properties")).json(new).send().await?;
        data(read_envelope(resp).await?)
    }

    async fn update(&self, id: &PropertyId, patch: &PropertyPatch) -> Result<Property, ClientError> {
        let resp = self
            .client
            .patch(self.url(&format!("/properties/{}", id)))
            .json(patch)
            .send()
            .await?;
        data(read_envelope(resp).await?)
    }

    async fn delete(&self, id: &PropertyId) -> Result<(), ClientError> {
        let resp = self.client.delete(self.url(&format!("/properties/{}", id))).send().await?;
        read_envelope::<serde_json::Value>(resp).await?;
        Ok(())
    }
}
