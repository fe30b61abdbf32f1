//! get_user_points tool - a user's point/gold ledger, cleaned for the model

use std::sync::Arc;

use async_trait::async_trait;

use super::{Tool, unquote};
use crate::mall::{LedgerEntry, MallClient, PointRecord};

pub struct UserPointsTool {
    mall: Arc<MallClient>,
}

impl UserPointsTool {
    pub fn new(mall: Arc<MallClient>) -> Self {
        Self { mall }
    }
}

#[async_trait]
impl Tool for UserPointsTool {
    fn name(&self) -> &str {
        "get_user_points"
    }

    fn description(&self) -> &str {
        "【核心工具】查询目标用户的积分/金币流水记录。参数: userName"
    }

    async fn call(&self, input: &str) -> Result<String, eyre::Error> {
        let user_name = unquote(input);
        if self.mall.token().is_none() {
            return Ok("Error: Token Missing".to_string());
        }

        match self.mall.user_points(&user_name).await {
            Ok(records) => format_ledger(&user_name, &records),
            Err(e) => Ok(format!("查询失败: {}", e)),
        }
    }
}

/// Observation text for a user's ledger
pub fn format_ledger(user_name: &str, records: &[PointRecord]) -> Result<String, eyre::Error> {
    if records.is_empty() {
        return Ok(format!("未找到用户 {} 的记录。", user_name));
    }
    let entries: Vec<LedgerEntry> = records.iter().map(PointRecord::clean).collect();
    Ok(serde_json::to_string(&entries)?)
}
