/// 本地模拟后端客户端
///
/// 对应 `POST {backend_url}/api/simulate` 与 `POST {backend_url}/api/compare`
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{CreativeComparisonReport, CreativeImage, FocusGroupReport, PersonaDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// `/api/simulate` 请求体
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub campaign_pitch: String,
    pub personas: Vec<PersonaDefinition>,
}

/// `/api/compare` 请求体（图片为 data URL）
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub image_a: String,
    pub image_b: String,
    pub personas: Vec<PersonaDefinition>,
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.backend_url, e))?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 请求本地后端运行焦点小组
    pub async fn simulate(
        &self,
        campaign_pitch: &str,
        personas: &[PersonaDefinition],
    ) -> AppResult<FocusGroupReport> {
        let body = SimulationRequest {
            campaign_pitch: campaign_pitch.to_string(),
            personas: personas.to_vec(),
        };
        self.post_json("/api/simulate", &body).await
    }

    /// 请求本地后端对比两张创意图
    pub async fn compare(
        &self,
        image_a: &CreativeImage,
        image_b: &CreativeImage,
        personas: &[PersonaDefinition],
    ) -> AppResult<CreativeComparisonReport> {
        let body = CompareRequest {
            image_a: image_a.to_data_url(),
            image_b: image_b.to_data_url(),
            personas: personas.to_vec(),
        };
        self.post_json("/api/compare", &body).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let endpoint = format!("{}{}", self.base_url, path);
        debug!("请求本地后端: {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))
    }
}
