//! Order and point-ledger records returned by the mall backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::html::strip_html;

/// Longest ledger description passed to the model, in characters
const DESCRIPTION_LIMIT: usize = 40;

/// A gift redemption order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    /// Numeric or string id, depending on the backend
    pub id: Option<Value>,
    pub buyer: Option<String>,
    pub gift_name: Option<String>,
    pub describe: Option<String>,
}

impl Order {
    pub fn buyer_name(&self) -> &str {
        self.buyer.as_deref().unwrap_or("未知用户")
    }

    pub fn gift(&self) -> &str {
        self.gift_name.as_deref().unwrap_or("N/A")
    }

    pub fn id_display(&self) -> String {
        match &self.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "未知".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Turn a raw order into the audit question handed to the engine
pub fn format_order_for_audit(order: &Order) -> String {
    let buyer = order.buyer.as_deref().unwrap_or("未知");
    format!(
        "--- 待审计订单 ---\n\
         买家: {buyer} | 订单号: {id}\n\
         礼品: {gift} | 备注: {describe}\n\
         请核查【{buyer}】的流水，判断其是否通过灌水、高频刷分等违规手段获取积分。",
        buyer = buyer,
        id = order.id_display(),
        gift = order.gift_name.as_deref().unwrap_or("未知"),
        describe = order.describe.as_deref().unwrap_or("无"),
    )
}

/// One raw point/gold ledger record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointRecord {
    pub created_time: Option<String>,
    pub point_item_name: Option<String>,
    pub trade_points: Option<Value>,
    pub description: Option<String>,
}

/// A ledger record cleaned for the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    #[serde(rename = "时间")]
    pub time: Option<String>,
    #[serde(rename = "事项")]
    pub item: Option<String>,
    #[serde(rename = "金币")]
    pub points: Option<Value>,
    #[serde(rename = "描述")]
    pub description: String,
}

impl PointRecord {
    /// Strip markup from the description and cap its length
    pub fn clean(&self) -> LedgerEntry {
        let text = strip_html(self.description.as_deref().unwrap_or(""));
        LedgerEntry {
            time: self.created_time.clone(),
            item: self.point_item_name.clone(),
            points: self.trade_points.clone(),
            description: text.chars().take(DESCRIPTION_LIMIT).collect(),
        }
    }
}
