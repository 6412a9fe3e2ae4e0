//! # Synthetic Focus Group
//!
//! 用一组合成人设（persona）模拟营销焦点小组，产出结构化的洞察报告
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 人设、报告、创意图等纯数据类型
//! - `PersonaRoster` - 人设列表的增删与导入
//! - `FocusGroupReport` / `CreativeComparisonReport` - 模型产出的报告
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 对外 HTTP 调用，不含业务判断
//! - `LlmClient` - Gemini / OpenAI 兼容接口
//! - `BackendClient` - 本地模拟后端
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - prompt → 模型 → 解析 → 校验
//! - `ExportService` - Word / JSON 报告导出
//! - `dashboard` - 终端展示
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一次模拟"的完整流程
//! - `SimulationFlow` - 本地后端优先，失败则直接调用模型
//!
//! ### ⑤ 编排层（App / Server）
//! - `app` - 命令行子命令的落地
//! - `server` - 本地后端 HTTP 服务
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, ExportOptions, RosterOptions};
pub use config::{Config, LlmProvider};
pub use error::{AppError, AppResult};
pub use models::{
    CreativeComparisonReport, CreativeImage, FocusGroupReport, PersonaDefinition, PersonaRoster,
};
pub use workflow::{ReportSource, SimulationFlow, SimulationOutcome};
