/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::FocusGroupReport;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 当前子命令
/// - `provider`: 模型提供方
/// - `model`: 模型名称
pub fn log_startup(command: &str, provider: &str, model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!("🤖 模型: {} ({})", model, provider);
    info!(
        "🕒 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录一次模拟的开始
pub fn log_run_start(kind: &str, persona_count: usize) {
    info!("\n{}", "─".repeat(60));
    info!("🎯 开始{}，参与人设: {} 位", kind, persona_count);
    info!("{}", "─".repeat(60));
}

/// 记录一次模拟的结束
pub fn log_run_complete(kind: &str, source: &str) {
    info!("{}", "─".repeat(60));
    info!("✅ {}完成，数据来源: {}", kind, source);
    info!("{}", "─".repeat(60));
}

/// 结论汇总与人设卡片不一致时记录警告，返回是否不一致
pub fn log_verdict_mismatch(report: &FocusGroupReport) -> bool {
    match report.verdict_mismatch() {
        Some((claimed, tallied)) => {
            warn!(
                "⚠️ 结论汇总与人设卡片不一致: 汇总 {:?}，卡片统计 {:?}",
                claimed, tallied
            );
            true
        }
        None => false,
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
        // 多字节字符按字符截断
        assert_eq!(truncate_text("你好世界", 2), "你好...");
    }

    #[test]
    fn test_log_verdict_mismatch() {
        let mut report: FocusGroupReport =
            serde_json::from_value(crate::models::report::fixtures::focus_group_json()).unwrap();
        assert!(!log_verdict_mismatch(&report));

        report.verdicts.apply = 3;
        assert!(log_verdict_mismatch(&report));
    }
}
