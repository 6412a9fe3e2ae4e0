/// OpenAI 兼容接口客户端
///
/// 使用 `async-openai` 调用任意兼容 Chat Completions 的服务。
/// 这类服务没有统一的 schema 约束参数，因此把 JSON Schema 放进系统消息里
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::CreativeImage;
use crate::prompts::to_json_schema;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use serde_json::Value;
use tracing::{debug, warn};

/// OpenAI 兼容客户端
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 系统消息：要求只输出符合 schema 的 JSON
    pub(crate) fn system_message(schema: &Value) -> String {
        let schema_text = serde_json::to_string_pretty(&to_json_schema(schema)).unwrap_or_default();
        format!(
            "You respond with a single JSON object and nothing else. \
             No Markdown, no commentary. The JSON must conform to this JSON Schema:\n{}",
            schema_text
        )
    }

    /// 发送聊天请求，返回模型输出的原始文本
    ///
    /// # 参数
    /// - `prompt`: 用户提示词
    /// - `images`: 以 data URL 形式追加到用户消息中的图片
    /// - `schema`: 响应 schema
    pub async fn generate(
        &self,
        prompt: &str,
        images: &[CreativeImage],
        schema: &Value,
    ) -> AppResult<String> {
        debug!("调用 OpenAI 兼容 API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符，图片: {} 张", prompt.len(), images.len());

        let map_build_err = |e: async_openai::error::OpenAIError| AppError::llm_api_failed(&self.model_name, e);

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(Self::system_message(schema))
            .build()
            .map_err(map_build_err)?;

        let user_msg = if images.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(map_build_err)?
        } else {
            // Vision：文本在前，图片按顺序追加
            let mut content_parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: prompt.to_string(),
                },
            )];
            for image in images {
                content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText {
                        text: format!("{}:", image.label),
                    },
                ));
                content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    ChatCompletionRequestMessageContentPartImage {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                            detail: Some(ImageDetail::Auto),
                        },
                    },
                ));
            }
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
                .build()
                .map_err(map_build_err)?
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.7)
            .build()
            .map_err(map_build_err)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                LlmError::EmptyContent {
                    provider: self.model_name.clone(),
                }
                .into()
            })
    }
}
