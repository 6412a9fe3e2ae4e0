//! 应用编排层
//!
//! 负责把命令行参数落到具体流程上：组装人设列表、运行模拟、展示与导出报告

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    load_persona_dir, load_persona_file, CreativeImage, PersonaRoster, DEFAULT_PITCH,
};
use crate::server;
use crate::services::{dashboard, ExportService};
use crate::utils::logging;
use crate::workflow::SimulationFlow;

/// 人设来源
#[derive(Debug, Clone, Default)]
pub struct RosterOptions {
    /// 额外导入的人设文件（.json / .toml）或目录
    pub persona_files: Vec<PathBuf>,
    /// 不加载内置的八位人设
    pub no_defaults: bool,
}

/// 导出选项
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// 导出 Word 报告
    pub docx: bool,
    /// 额外保存原始 JSON 的路径
    pub json_out: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 启动本地后端
    pub async fn serve(self) -> Result<()> {
        logging::log_startup(
            "本地后端服务",
            self.config.llm_provider.name(),
            &self.config.llm_model_name,
        );
        if self.config.require_api_key().is_err() {
            warn!("⚠️ 未配置 API Key，所有模拟请求都会失败");
        }
        server::start_server(self.config)?.await?;
        Ok(())
    }

    /// 组装人设列表：内置人设 + 导入文件
    pub async fn build_roster(&self, options: &RosterOptions) -> Result<PersonaRoster> {
        let mut roster = if options.no_defaults {
            PersonaRoster::new()
        } else {
            PersonaRoster::with_defaults()
        };

        for path in &options.persona_files {
            if path.is_dir() {
                roster.extend(load_persona_dir(path).await?);
            } else {
                let personas = load_persona_file(path).await?;
                info!("✓ 从 {} 导入 {} 个人设", path.display(), personas.len());
                roster.extend(personas);
            }
        }
        Ok(roster)
    }

    /// 列出人设
    pub async fn list_personas(&self, options: &RosterOptions) -> Result<String> {
        let roster = self.build_roster(options).await?;
        Ok(dashboard::render_roster(roster.as_slice()))
    }

    /// 运行焦点小组，返回终端展示文本
    pub async fn simulate(
        &self,
        pitch_file: Option<&Path>,
        roster_options: &RosterOptions,
        export: &ExportOptions,
    ) -> Result<String> {
        logging::log_startup(
            "焦点小组模拟",
            self.config.llm_provider.name(),
            &self.config.llm_model_name,
        );

        let pitch = match pitch_file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?,
            None => DEFAULT_PITCH.to_string(),
        };
        let roster = self.build_roster(roster_options).await?;

        let flow = SimulationFlow::new(&self.config)?;
        let outcome = flow.run_focus_group(&pitch, roster.as_slice()).await?;

        let exporter = ExportService::new(&self.config.output_dir);
        if export.docx {
            exporter.export_focus_group(&outcome.report).await?;
        }
        if let Some(path) = &export.json_out {
            save_json(path, &outcome.report).await?;
        }

        Ok(dashboard::render_focus_group(&outcome.report, outcome.source))
    }

    /// 对比两张创意图，返回终端展示文本
    pub async fn compare(
        &self,
        image_a: &Path,
        image_b: &Path,
        roster_options: &RosterOptions,
        export: &ExportOptions,
    ) -> Result<String> {
        logging::log_startup(
            "创意对比",
            self.config.llm_provider.name(),
            &self.config.llm_model_name,
        );

        let creative_a = CreativeImage::from_file("Creative A", image_a).await?;
        let creative_b = CreativeImage::from_file("Creative B", image_b).await?;
        let roster = self.build_roster(roster_options).await?;

        let flow = SimulationFlow::new(&self.config)?;
        let outcome = flow
            .compare_creatives(Some(&creative_a), Some(&creative_b), roster.as_slice())
            .await?;

        let exporter = ExportService::new(&self.config.output_dir);
        if export.docx {
            exporter.export_creative(&outcome.report).await?;
        }
        if let Some(path) = &export.json_out {
            save_json(path, &outcome.report).await?;
        }

        Ok(dashboard::render_creative(&outcome.report, outcome.source))
    }
}

/// 把原始报告写到任意路径（目录不存在则创建）
async fn save_json<T: serde::Serialize>(path: &Path, report: &T) -> Result<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Invalid JSON output path: {}", path.display()))?;
    Ok(ExportService::new(dir).export_json(&file_name, report).await?)
}
