// Remote Data Gateway contract
// The hosted store is reached through table-style reads and single-row inserts.
// Implementations: `postgrest::PostgrestGateway` (HTTP) and `memory::InMemoryGateway`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Expected at most one row from {table}, got {count}")]
    MultipleRows { table: String, count: usize },

    #[error("Insert rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// A read against one table: `select *`, optional equality filters and
/// an ordered list of sort keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<(String, Value)>,
    pub order: Vec<OrderBy>,
}

impl Query {
    pub fn select(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Sort keys apply in call order; the first call is the primary key.
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            row.get(column)
                .map_or(false, |actual| value_text(actual) == value_text(expected))
        })
    }

    pub fn sort_rows(&self, rows: &mut [Value]) {
        if self.order.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for key in &self.order {
                let ord = compare_values(a.get(&key.column), b.get(&key.column));
                let ord = if key.ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

/// Text form of a filter value as it appears on the wire.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Nulls compare above every value, so they land last ascending and first
// descending, as PostgreSQL orders them by default.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}

#[async_trait]
pub trait DataGateway: Send + Sync + 'static {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError>;

    // Exactly one record per call; no batching and no idempotency key.
    async fn insert(&self, table: &str, record: Value) -> Result<(), GatewayError>;

    async fn maybe_single(&self, query: &Query) -> Result<Option<Value>, GatewayError> {
        let mut rows = self.select(query).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(GatewayError::MultipleRows {
                table: query.table.clone(),
                count,
            }),
        }
    }
}

pub async fn select_as<T: DeserializeOwned>(
    gateway: &dyn DataGateway,
    query: &Query,
) -> Result<Vec<T>, GatewayError> {
    gateway
        .select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| GatewayError::Decode(e.to_string())))
        .collect()
}

pub async fn maybe_single_as<T: DeserializeOwned>(
    gateway: &dyn DataGateway,
    query: &Query,
) -> Result<Option<T>, GatewayError> {
    gateway
        .maybe_single(query)
        .await?
        .map(|row| serde_json::from_value(row).map_err(|e| GatewayError::Decode(e.to_string())))
        .transpose()
}
