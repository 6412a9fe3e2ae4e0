//! LLM 服务 - 业务能力层
//!
//! 只负责"让模型产出一份结构化报告"能力，不关心本地后端与回退流程
//!
//! ## 流程
//! 1. 构建 prompt（`prompts`）
//! 2. 调用模型（`clients::LlmClient`），附带响应 schema
//! 3. 去掉可能的 Markdown 代码块，解析 JSON
//! 4. 按 schema 校验，再反序列化为强类型报告

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::{AppResult, LlmError};
use crate::models::{CreativeComparisonReport, CreativeImage, FocusGroupReport, PersonaDefinition};
use crate::prompts::{self, SchemaViolation};
use crate::utils::logging::{self, truncate_text};

/// LLM 服务
///
/// 职责：
/// - 构建焦点小组 / 创意对比的 prompt
/// - 调用模型并把输出解析为报告
/// - 不关心本地后端，也不做回退
pub struct LlmService {
    client: LlmClient,
}

impl LlmService {
    /// 创建新的 LLM 服务（要求已配置 API Key）
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// 通用的结构化调用
    ///
    /// # 参数
    /// - `prompt`: 用户提示词
    /// - `images`: 附带的图片（可为空）
    /// - `schema`: 响应 schema，同时用于约束与校验
    ///
    /// # 返回
    /// 返回反序列化后的报告
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        images: &[CreativeImage],
        schema: &Value,
    ) -> AppResult<T> {
        debug!(
            "调用 {}，模型: {}",
            self.client.provider_name(),
            self.client.model_name()
        );

        let raw = self.client.generate(prompt, images, schema).await?;
        debug!("模型原始输出: {}", truncate_text(&raw, 200));

        parse_structured(&raw, schema)
    }

    /// 运行焦点小组模拟
    pub async fn run_focus_group(
        &self,
        campaign_pitch: &str,
        personas: &[PersonaDefinition],
    ) -> AppResult<FocusGroupReport> {
        info!("🤖 直接调用模型模拟焦点小组讨论...");
        let prompt = prompts::build_focus_group_prompt(campaign_pitch, personas);
        let report: FocusGroupReport = self
            .generate_structured(&prompt, &[], &prompts::focus_group_schema())
            .await?;

        logging::log_verdict_mismatch(&report);
        Ok(report)
    }

    /// 对比两张创意图
    pub async fn compare_creatives(
        &self,
        creative_a: &CreativeImage,
        creative_b: &CreativeImage,
        personas: &[PersonaDefinition],
    ) -> AppResult<CreativeComparisonReport> {
        info!("🤖 直接调用模型对比两张创意图...");
        let prompt = prompts::build_creative_prompt(personas);
        self.generate_structured(
            &prompt,
            &[creative_a.clone(), creative_b.clone()],
            &prompts::creative_comparison_schema(),
        )
        .await
    }
}

/// 解析并校验模型输出
pub fn parse_structured<T: DeserializeOwned>(raw: &str, schema: &Value) -> AppResult<T> {
    let json_text = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(json_text).map_err(|source| LlmError::InvalidJson { source })?;

    let violations = prompts::validate(&value, schema);
    if !violations.is_empty() {
        warn!("模型输出未通过 schema 校验: {} 处问题", violations.len());
        return Err(LlmError::SchemaViolation {
            violations: violations.iter().map(SchemaViolation::to_string).collect(),
        }
        .into());
    }

    serde_json::from_value(value).map_err(|source| LlmError::InvalidJson { source }.into())
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fence(raw: &str) -> &str {
    if let Ok(re) = Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```\s*$") {
        if let Some(m) = re.captures(raw).and_then(|c| c.get(1)) {
            return m.as_str();
        }
    }
    raw.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::report::fixtures::{creative_json, focus_group_json};
    use crate::models::Verdict;
    use crate::prompts::{creative_comparison_schema, focus_group_schema};

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  ```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_structured_focus_group() {
        let raw = format!("```json\n{}\n```", focus_group_json());
        let report: FocusGroupReport = parse_structured(&raw, &focus_group_schema()).unwrap();
        assert_eq!(report.personas[0].verdict, Verdict::Apply);
        assert_eq!(report.missed_opportunities.len(), 1);
    }

    #[test]
    fn test_parse_structured_creative() {
        let raw = creative_json().to_string();
        let report: CreativeComparisonReport =
            parse_structured(&raw, &creative_comparison_schema()).unwrap();
        assert_eq!(report.overall_winner, "Creative B");
    }

    #[test]
    fn test_parse_structured_invalid_json() {
        let err = parse_structured::<FocusGroupReport>("Sorry, I can't help.", &focus_group_schema())
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::InvalidJson { .. })));
    }

    #[test]
    fn test_parse_structured_schema_violation() {
        let mut json = focus_group_json();
        json.as_object_mut().unwrap().remove("personas");
        let err = parse_structured::<FocusGroupReport>(&json.to_string(), &focus_group_schema())
            .unwrap_err();
        assert!(err.to_string().contains("$.personas: missing required field"));
    }

    #[test]
    fn test_parse_structured_counts() {
        let mut json = focus_group_json();
        json["featureSentiments"][0]["positive"] = serde_json::json!(2.0);
        let report: FocusGroupReport = parse_structured(&json.to_string(), &focus_group_schema()).unwrap();
        assert_eq!(report.feature_sentiments[0].positive, 2);

        json["verdicts"]["apply"] = serde_json::json!(-1);
        let err = parse_structured::<FocusGroupReport>(&json.to_string(), &focus_group_schema())
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::SchemaViolation { .. })));
        assert!(err.to_string().contains("$.verdicts.apply: -1 is less than minimum 0"));
    }

    /// 测试真实 Gemini 调用
    ///
    /// 运行方式：
    /// ```bash
    /// GEMINI_API_KEY=... cargo test test_live_focus_group -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_focus_group() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let service = LlmService::new(&config).expect("需要配置 GEMINI_API_KEY");
        let personas = crate::models::default_personas();

        let report = service
            .run_focus_group(crate::models::DEFAULT_PITCH, &personas[..3])
            .await
            .expect("模型调用失败");

        println!("{}", report.executive_summary);
        assert!(!report.personas.is_empty());
    }
}
