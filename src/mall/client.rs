//! HTTP client for the points-mall backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::order::{Order, PointRecord};
use crate::config::MallConfig;
use crate::error::{AuditError, ConfigError, Result};

/// Anything that can list the newest redemption orders
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn latest_orders(&self, size: u32) -> Result<Vec<Order>>;
}

/// List responses wrap their rows in `data`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<Vec<T>>,
}

pub struct MallClient {
    client: Client,
    order_api: String,
    point_api: String,
    token: Option<String>,
    point_page_size: u32,
}

impl MallClient {
    pub fn new(config: &MallConfig) -> Result<Self> {
        let order_api = config.order_api.clone().ok_or(ConfigError::Missing("mall.order_api"))?;
        let point_api = config.point_api.clone().ok_or(ConfigError::Missing("mall.point_api"))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            order_api,
            point_api,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            point_page_size: config.point_page_size,
        })
    }

    /// Session token, if one is configured
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Point/gold ledger of a user, newest page only
    pub async fn user_points(&self, user_name: &str) -> Result<Vec<PointRecord>> {
        let size = self.point_page_size.to_string();
        self.get_list(
            &self.point_api,
            &[("userName", user_name), ("pageIndex", "1"), ("pageSize", size.as_str())],
        )
        .await
    }

    async fn get_list<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let token = self
            .token()
            .ok_or_else(|| AuditError::Mall("session token missing".to_string()))?;

        let response = self
            .client
            .get(url)
            .header("Authorization", token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Mall(format!("{} returned {}", url, status)));
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl OrderSource for MallClient {
    async fn latest_orders(&self, size: u32) -> Result<Vec<Order>> {
        let size = size.to_string();
        self.get_list(&self.order_api, &[("pageIndex", "1"), ("pageSize", size.as_str())])
            .await
    }
}

impl std::fmt::Debug for MallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MallClient")
            .field("order_api", &self.order_api)
            .field("point_api", &self.point_api)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mall_config(token: Option<&str>) -> MallConfig {
        MallConfig {
            order_api: Some("http://127.0.0.1:9/orders".to_string()),
            point_api: Some("http://127.0.0.1:9/points".to_string()),
            token: token.map(str::to_string),
            ..MallConfig::default()
        }
    }

    #[test]
    fn test_new_requires_endpoints() {
        let config = MallConfig::default();
        let err = MallClient::new(&config).unwrap_err();
        assert!(matches!(err, AuditError::Config(ConfigError::Missing("mall.order_api"))));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let client = MallClient::new(&mall_config(Some("  "))).unwrap();
        assert!(client.token().is_none());

        let client = MallClient::new(&mall_config(Some("abc"))).unwrap();
        assert_eq!(client.token(), Some("abc"));
    }

    #[tokio::test]
    async fn test_requests_without_token_fail_fast() {
        let client = MallClient::new(&mall_config(None)).unwrap();

        let err = client.latest_orders(5).await.unwrap_err();
        assert!(err.to_string().contains("token missing"));

        let err = client.user_points("alice").await.unwrap_err();
        assert!(matches!(err, AuditError::Mall(_)));
    }

    #[test]
    fn test_envelope_missing_data() {
        let envelope: Envelope<Order> = serde_json::from_str("{\"code\": 0}").unwrap();
        assert!(envelope.data.is_none());

        let envelope: Envelope<Order> = serde_json::from_str("{\"data\": null}").unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_envelope_rows_need_only_deserialize() {
        #[derive(Debug, Deserialize)]
        struct Row {
            n: u32,
        }

        let envelope: Envelope<Row> = serde_json::from_str("{\"data\": [{\"n\": 3}]}").unwrap();
        assert_eq!(envelope.data.unwrap()[0].n, 3);
    }

    fn mall_for(server: &MockServer, token: Option<&str>) -> MallClient {
        MallClient::new(&MallConfig {
            order_api: Some(format!("{}/orders", server.uri())),
            point_api: Some(format!("{}/points", server.uri())),
            token: token.map(str::to_string),
            ..MallConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_points_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points"))
            .and(header("Authorization", "tok-1"))
            .and(query_param("userName", "Alice"))
            .and(query_param("pageIndex", "1"))
            .and(query_param("pageSize", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": [{
                    "createdTime": "2026-03-01 10:00:00",
                    "pointItemName": "签到",
                    "tradePoints": 5,
                    "description": "<b>每日签到</b>"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = mall_for(&server, Some("tok-1")).user_points("Alice").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].point_item_name.as_deref(), Some("签到"));
        assert_eq!(records[0].clean().description, "每日签到");
    }

    #[tokio::test]
    async fn test_latest_orders_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders"))
            .and(header("Authorization", "tok-1"))
            .and(query_param("pageIndex", "1"))
            .and(query_param("pageSize", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 7, "buyer": "Alice", "giftName": "耳机"},
                    {"id": "A-8", "buyer": "Bob"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let orders = mall_for(&server, Some("tok-1")).latest_orders(5).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].buyer_name(), "Alice");
        assert_eq!(orders[0].id_display(), "7");
        assert_eq!(orders[1].id_display(), "A-8");
        assert_eq!(orders[1].gift(), "N/A");
    }

    #[tokio::test]
    async fn test_null_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let records = mall_for(&server, Some("tok-1")).user_points("Nobody").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_mall_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = mall_for(&server, Some("tok-1")).latest_orders(5).await.unwrap_err();
        assert!(matches!(&err, AuditError::Mall(message) if message.contains("500")));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = MallClient::new(&mall_config(Some("secret-token"))).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("has_token: true"));
        assert!(!debug_str.contains("secret-token"));
    }
}
