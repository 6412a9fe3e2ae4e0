//! 模拟流程 - 流程层
//!
//! 核心职责：定义"一次模拟"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验输入（活动文案 / 人设 / 创意图）
//! 2. 尝试本地后端 `POST /api/simulate`
//! 3. 失败则直接调用模型（兜底）
//!
//! 只做一次顺序回退：不重试、不退避、不取消

use tracing::{info, warn};

use crate::clients::BackendClient;
use crate::config::Config;
use crate::error::{AppResult, InputError};
use crate::models::{CreativeComparisonReport, CreativeImage, FocusGroupReport, PersonaDefinition};
use crate::services::LlmService;
use crate::utils::logging;

/// 报告来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    /// 本地后端
    Backend,
    /// 直接调用模型
    DirectModel,
}

impl ReportSource {
    pub fn label(self) -> &'static str {
        match self {
            ReportSource::Backend => "local backend",
            ReportSource::DirectModel => "direct model call",
        }
    }
}

/// 模拟结果
#[derive(Debug, Clone)]
pub struct SimulationOutcome<R> {
    pub report: R,
    pub source: ReportSource,
}

/// 模拟流程
///
/// - 编排"本地后端 → 直接调用模型"的回退
/// - 只依赖业务能力（clients / services）
pub struct SimulationFlow {
    backend: Option<BackendClient>,
    config: Config,
}

impl SimulationFlow {
    /// 创建新的模拟流程
    ///
    /// `use_local_backend = false` 时跳过本地后端，直接调用模型
    pub fn new(config: &Config) -> AppResult<Self> {
        let backend = if config.use_local_backend {
            Some(BackendClient::new(config)?)
        } else {
            None
        };
        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    /// 运行焦点小组
    pub async fn run_focus_group(
        &self,
        campaign_pitch: &str,
        personas: &[PersonaDefinition],
    ) -> AppResult<SimulationOutcome<FocusGroupReport>> {
        validate_focus_group_input(campaign_pitch, personas)?;
        logging::log_run_start("焦点小组模拟", personas.len());

        if let Some(backend) = &self.backend {
            match backend.simulate(campaign_pitch, personas).await {
                Ok(report) => {
                    info!("✓ 已从本地后端获取报告: {}", backend.base_url());
                    logging::log_verdict_mismatch(&report);
                    return Ok(self.finish("焦点小组模拟", report, ReportSource::Backend));
                }
                Err(e) => {
                    warn!("本地后端不可用 ({}), 改为直接调用模型...", e);
                }
            }
        }

        let service = LlmService::new(&self.config)?;
        let report = service.run_focus_group(campaign_pitch, personas).await?;
        Ok(self.finish("焦点小组模拟", report, ReportSource::DirectModel))
    }

    /// 对比两张创意图
    pub async fn compare_creatives(
        &self,
        creative_a: Option<&CreativeImage>,
        creative_b: Option<&CreativeImage>,
        personas: &[PersonaDefinition],
    ) -> AppResult<SimulationOutcome<CreativeComparisonReport>> {
        let (Some(creative_a), Some(creative_b)) = (creative_a, creative_b) else {
            return Err(InputError::MissingCreative.into());
        };
        if personas.is_empty() {
            return Err(InputError::NoPersonas.into());
        }
        logging::log_run_start("创意对比", personas.len());

        if let Some(backend) = &self.backend {
            match backend.compare(creative_a, creative_b, personas).await {
                Ok(report) => {
                    info!("✓ 已从本地后端获取报告: {}", backend.base_url());
                    return Ok(self.finish("创意对比", report, ReportSource::Backend));
                }
                Err(e) => {
                    warn!("本地后端不可用 ({}), 改为直接调用模型...", e);
                }
            }
        }

        let service = LlmService::new(&self.config)?;
        let report = service
            .compare_creatives(creative_a, creative_b, personas)
            .await?;
        Ok(self.finish("创意对比", report, ReportSource::DirectModel))
    }

    fn finish<R>(&self, kind: &str, report: R, source: ReportSource) -> SimulationOutcome<R> {
        logging::log_run_complete(kind, source.label());
        SimulationOutcome { report, source }
    }
}

/// 运行焦点小组前的输入校验：文案非空、至少一个人设
pub fn validate_focus_group_input(
    campaign_pitch: &str,
    personas: &[PersonaDefinition],
) -> Result<(), InputError> {
    if campaign_pitch.trim().is_empty() {
        return Err(InputError::EmptyPitch);
    }
    if personas.is_empty() {
        return Err(InputError::NoPersonas);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::default_personas;

    #[test]
    fn test_validate_input() {
        let personas = default_personas();
        assert_eq!(
            validate_focus_group_input("   \n", &personas),
            Err(InputError::EmptyPitch)
        );
        assert_eq!(validate_focus_group_input("pitch", &[]), Err(InputError::NoPersonas));
        assert!(validate_focus_group_input("pitch", &personas).is_ok());
    }

    #[tokio::test]
    async fn test_empty_pitch_never_calls_out() {
        let flow = SimulationFlow::new(&Config::default()).unwrap();
        let err = flow.run_focus_group("", &default_personas()).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::EmptyPitch)));
    }

    #[tokio::test]
    async fn test_missing_creative() {
        let flow = SimulationFlow::new(&Config::default()).unwrap();
        let image = CreativeImage::new("Creative A", "image/png", b"a");
        let err = flow
            .compare_creatives(Some(&image), None, &default_personas())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Both Creative A and Creative B images are required.");
    }

    #[tokio::test]
    async fn test_fallback_without_api_key_reports_missing_key() {
        let mut config = Config::default();
        config.backend_url = "http://127.0.0.1:9".to_string();
        config.request_timeout_secs = 2;
        config.llm_api_key = String::new();

        let flow = SimulationFlow::new(&config).unwrap();
        let err = flow
            .run_focus_group("pitch", &default_personas())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }
}
