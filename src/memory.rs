// In-process gateway with seeded tables and failure injection

use crate::gateway::{DataGateway, GatewayError, Query};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct InMemoryGateway {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    request_count: AtomicUsize,
    insert_count: AtomicUsize,
    fail_next_requests: AtomicUsize,
    delay_ms: AtomicUsize,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            request_count: AtomicUsize::new(0),
            insert_count: AtomicUsize::new(0),
            fail_next_requests: AtomicUsize::new(0),
            delay_ms: AtomicUsize::new(0),
        }
    }

    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        self.seed(table, rows);
        self
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    /// The next `count` calls fail with a 500 before touching any table.
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next_requests.store(count, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay_ms: usize) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count.load(Ordering::SeqCst)
    }

    async fn begin_request(&self) -> Result<(), GatewayError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        let failed = self
            .fail_next_requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(GatewayError::Api {
                status_code: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        self.begin_request().await?;

        let tables = self.tables.read();
        let Some(rows) = tables.get(&query.table) else {
            return Err(GatewayError::Api {
                status_code: 404,
                message: format!("relation \"{}\" does not exist", query.table),
            });
        };

        let mut matched: Vec<Value> = rows.iter().filter(|row| query.matches(row)).cloned().collect();
        drop(tables);

        query.sort_rows(&mut matched);
        Ok(matched)
    }

    async fn insert(&self, table: &str, record: Value) -> Result<(), GatewayError> {
        self.begin_request().await?;

        let Value::Object(mut fields) = record else {
            return Err(GatewayError::Rejected("record must be a JSON object".to_string()));
        };
        fields
            .entry("id")
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));

        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(Value::Object(fields));
        self.insert_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_filters_and_orders() {
        let gateway = InMemoryGateway::new().with_table(
            "packages",
            vec![
                json!({"id": "p1", "price": 100, "is_featured": true}),
                json!({"id": "p2", "price": 300, "is_featured": false}),
                json!({"id": "p3", "price": 200, "is_featured": true}),
            ],
        );

        let rows = gateway
            .select(&Query::select("packages").eq("is_featured", true).order("price", false))
            .await
            .unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["p3", "p1"]);
        assert_eq!(gateway.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() {
        let gateway = InMemoryGateway::new();
        let err = gateway.select(&Query::select("nowhere")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status_code: 404, .. }));
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let gateway = InMemoryGateway::new();
        gateway
            .insert("bookings", json!({"name": "Asha"}))
            .await
            .unwrap();

        let rows = gateway.rows("bookings");
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["id"].is_string());
        assert_eq!(gateway.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_next_requests_counts_down() {
        let gateway = InMemoryGateway::new().with_table("categories", vec![]);
        gateway.fail_next_requests(1);

        assert!(gateway.select(&Query::select("categories")).await.is_err());
        assert!(gateway.select(&Query::select("categories")).await.is_ok());
    }

    #[tokio::test]
    async fn test_maybe_single_rejects_duplicates() {
        let gateway = InMemoryGateway::new().with_table(
            "categories",
            vec![json!({"slug": "treks"}), json!({"slug": "treks"})],
        );

        let err = gateway
            .maybe_single(&Query::select("categories").eq("slug", "treks"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::MultipleRows {
                table: "categories".to_string(),
                count: 2
            }
        );
    }
}
