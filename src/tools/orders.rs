//! get_latest_orders tool - newest redemption orders as JSON

use std::sync::Arc;

use async_trait::async_trait;

use super::{Tool, unquote};
use crate::mall::{MallClient, OrderSource};

const DEFAULT_SIZE: u32 = 10;

pub struct LatestOrdersTool {
    mall: Arc<MallClient>,
}

impl LatestOrdersTool {
    pub fn new(mall: Arc<MallClient>) -> Self {
        Self { mall }
    }
}

/// Page size from the model's argument; anything unparsable means the default
fn parse_size(input: &str) -> u32 {
    unquote(input)
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_SIZE)
}

#[async_trait]
impl Tool for LatestOrdersTool {
    fn name(&self) -> &str {
        "get_latest_orders"
    }

    fn description(&self) -> &str {
        "查询商城最新的兑换订单列表。参数: 条数 (默认 10)"
    }

    async fn call(&self, input: &str) -> Result<String, eyre::Error> {
        let orders = self.mall.latest_orders(parse_size(input)).await?;
        Ok(serde_json::to_string(&orders)?)
    }
}
