//! Built-in audit prompt texts

/// System turn that opens every audit transcript
pub const SYSTEM_PROMPT: &str = "你是一个专业的商城积分审计专家。请严格按照 Thought/Action 格式进行逻辑推理。";

/// Default `{history}` value for a fresh audit
pub const DEFAULT_HISTORY: &str = "审计开始，正在分析初步线索...";

/// Default `{tools}` catalogue shown to the model
pub const DEFAULT_TOOL_CATALOGUE: &str = "- get_user_points[userName]: 【核心工具】查询目标用户的积分/金币流水记录。";

/// Minimal template used when a custom template file is empty
pub const FALLBACK_TEMPLATE: &str = "Question: {question}\nHistory: {history}\nTools: {tools}";

/// ReAct audit template
pub const AUDIT_TEMPLATE: &str = r#"
你现在的任务是针对下方提供的特定订单进行深度审计，严禁重复调用工具获取订单信息。
你应该根据下方提供的订单信息，根据审计准则直接调用可用工具来核查其积分合法性。
【可用工具】:
{tools}

【审计准则】:
- 预警线：单次/短时间内获取金币 > {gold_threshold} 或 经验 > {exp_threshold}。
- 重点怀疑：评论内容雷同、极短时间内高频发帖、或多个账号共享同一手机号。
- 判定结果：必须明确给出 [合规]、[违规] 或 [高风险待观察]。
- 审计日期：{current_date}

【严格指令】:
1. 每次回应必须包含 Thought 和 Action 两个部分。
2. 必须先通过 Thought 拆解疑点，再决定是否 Action。
3. 如果订单信息已足以断定违规（如明显的手机号重复），可直接 Finish。
4. 如果信息不足，必须调用 get_user_points 获取证据。

【回应格式】:
Thought: 思考过程。
Action: 必须是以下之一：
- `tool_name[tool_input]`
- `Finish[最终审计结论，需包含判定理由和证据摘要]`

现在开始任务：
Question: {question}
History: {history}
"#;
