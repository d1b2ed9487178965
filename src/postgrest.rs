// HTTP gateway for a hosted PostgREST endpoint.
// Reads map to `GET /rest/v1/{table}` with `eq.` filters and a single
// `order` parameter; inserts map to `POST /rest/v1/{table}` carrying a
// one-element array. Every call is exactly one request.

use crate::config::GatewayConfig;
use crate::gateway::{value_text, DataGateway, GatewayError, Query};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, warn};

pub struct PostgrestGateway {
    client: reqwest::Client,
    rest_url: String,
    timeout_ms: u64,
}

impl PostgrestGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| GatewayError::Network(format!("invalid api key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| GatewayError::Network(format!("invalid authorization header: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Reuses an existing [`reqwest::Client`]; its default headers must
    /// already carry the credential.
    pub fn with_client(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", config.base_url.trim_end_matches('/')),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Query-string pairs for a read, in the order PostgREST expects them.
    pub fn query_params(query: &Query) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &query.filters {
            params.push((column.clone(), format!("eq.{}", value_text(value))));
        }
        if !query.order.is_empty() {
            let order = query
                .order
                .iter()
                .map(|key| {
                    format!(
                        "{}.{}",
                        key.column,
                        if key.ascending { "asc" } else { "desc" }
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }
        params
    }

    fn map_send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout_ms)
        } else {
            GatewayError::Network(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Api {
            status_code: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DataGateway for PostgrestGateway {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        let params = Self::query_params(query);
        debug!(table = %query.table, ?params, "select");

        let response = self
            .client
            .get(self.table_url(&query.table))
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn insert(&self, table: &str, record: Value) -> Result<(), GatewayError> {
        debug!(table, "insert");

        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await.map(|_| ()).map_err(|err| {
            warn!(table, error = %err, "insert rejected");
            err
        })
    }
}
