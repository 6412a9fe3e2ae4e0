/// Gemini API 客户端
///
/// 直接调用 `generateContent` 接口，并通过 `responseSchema` 约束输出为 JSON
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, LlmError};
use crate::models::CreativeImage;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.llm_api_base_url, e))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    /// 构建请求体：文本 + 内联图片 + JSON 输出约束
    fn build_body(prompt: &str, images: &[CreativeImage], schema: &Value) -> Value {
        let mut parts = vec![json!({ "text": prompt })];
        for image in images {
            parts.push(json!({ "text": format!("{}:", image.label) }));
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data_base64,
                }
            }));
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        })
    }

    /// 调用 generateContent，返回模型输出的原始文本
    ///
    /// # 参数
    /// - `prompt`: 用户提示词
    /// - `images`: 随请求附带的图片（可为空）
    /// - `schema`: 响应 schema
    pub async fn generate_content(
        &self,
        prompt: &str,
        images: &[CreativeImage],
        schema: &Value,
    ) -> AppResult<String> {
        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符，图片: {} 张", prompt.len(), images.len());

        let endpoint = self.endpoint();
        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(prompt, images, schema))
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 调用失败: {}", e);
                AppError::llm_api_failed(&self.model_name, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API 返回错误状态: {}", status);
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        debug!("Gemini API 调用成功");

        extract_text(parsed).ok_or_else(|| {
            LlmError::EmptyContent {
                provider: "Gemini".to_string(),
            }
            .into()
        })
    }
}

/// 拼接第一个候选结果中的全部文本片段
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
