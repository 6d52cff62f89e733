use catalog::{Category, Envelope, ProductPage, ProductPayload, ProductQuery, ProductView};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

pub const DEFAULT_ORIGIN: &str = "http://localhost:5000";

/// Typed access to the `/api` routes of one server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(origin: &str) -> Self {
        Self {
            http: Client::new(),
            base: format!("{}/api", origin.trim_end_matches('/')),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> Result<ProductView, ClientError> {
        self.send(self.http.post(self.url("/products")).json(payload))
            .await
    }

    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ClientError> {
        self.send(self.http.get(self.url("/products")).query(&query.to_pairs()))
            .await
    }

    pub async fn get_product(&self, id: &str) -> Result<ProductView, ClientError> {
        self.send(self.http.get(self.url(&format!("/products/{id}"))))
            .await
    }

    pub async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<ProductView, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/products/{id}")))
                .json(payload),
        )
        .await
    }

    pub async fn delete_product(&self, id: &str) -> Result<ProductView, ClientError> {
        self.send(self.http.delete(self.url(&format!("/products/{id}"))))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.send(self.http.get(self.url("/categories"))).await
    }

    pub async fn category(&self, id: &str) -> Result<Category, ClientError> {
        self.send(self.http.get(self.url(&format!("/categories/{id}"))))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Sends the request and unwraps the envelope. Failures keep the server's message and field errors.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{status} from server, {} bytes", body.len());

        if status.is_success() {
            let envelope: Envelope<T> = serde_json::from_str(&body)?;
            return envelope.data.ok_or(ClientError::MissingData);
        }

        let rejected = match serde_json::from_str::<Envelope<()>>(&body) {
            Ok(envelope) => ClientError::Rejected {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| status.to_string()),
                errors: envelope.errors.unwrap_or_default(),
            },
            Err(_) => ClientError::Rejected {
                status: status.as_u16(),
                message: status.to_string(),
                errors: Vec::new(),
            },
        };
        Err(rejected)
    }
}
