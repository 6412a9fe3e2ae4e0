/// LLM 客户端
///
/// 按配置在 Gemini 原生接口与 OpenAI 兼容接口之间选择
use crate::clients::{GeminiClient, OpenAiClient};
use crate::config::{Config, LlmProvider};
use crate::error::AppResult;
use crate::models::CreativeImage;
use serde_json::Value;

pub enum LlmClient {
    Gemini(GeminiClient),
    OpenAi(OpenAiClient),
}

impl LlmClient {
    /// 根据配置创建客户端（要求已配置 API Key）
    pub fn new(config: &Config) -> AppResult<Self> {
        config.require_api_key()?;
        Ok(match config.llm_provider {
            LlmProvider::Gemini => LlmClient::Gemini(GeminiClient::new(config)?),
            LlmProvider::OpenAi => LlmClient::OpenAi(OpenAiClient::new(config)),
        })
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            LlmClient::Gemini(_) => LlmProvider::Gemini.name(),
            LlmClient::OpenAi(_) => LlmProvider::OpenAi.name(),
        }
    }

    pub fn model_name(&self) -> &str {
        match self {
            LlmClient::Gemini(c) => c.model_name(),
            LlmClient::OpenAi(c) => c.model_name(),
        }
    }

    /// 发送 prompt（可附带图片），返回模型的原始文本输出
    pub async fn generate(
        &self,
        prompt: &str,
        images: &[CreativeImage],
        schema: &Value,
    ) -> AppResult<String> {
        match self {
            LlmClient::Gemini(c) => c.generate_content(prompt, images, schema).await,
            LlmClient::OpenAi(c) => c.generate(prompt, images, schema).await,
        }
    }
}
