//! 报告导出服务 - 业务能力层
//!
//! 只负责"把报告写成 Word 文档 / JSON 文件"能力

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, Paragraph, Run, Style, StyleType,
};
use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{CreativeAnalysis, CreativeComparisonReport, FocusGroupReport};

/// 焦点小组报告的默认文件名
pub const FOCUS_GROUP_FILE_NAME: &str = "Focus_Group_Report.docx";
/// 创意对比报告的默认文件名
pub const CREATIVE_FILE_NAME: &str = "Creative_Comparison_Report.docx";

/// 报告导出服务
pub struct ExportService {
    output_dir: PathBuf,
}

impl ExportService {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 导出焦点小组报告，返回文件路径
    pub async fn export_focus_group(&self, report: &FocusGroupReport) -> AppResult<PathBuf> {
        let bytes = focus_group_docx(report)?;
        self.write(FOCUS_GROUP_FILE_NAME, &bytes).await
    }

    /// 导出创意对比报告，返回文件路径
    pub async fn export_creative(&self, report: &CreativeComparisonReport) -> AppResult<PathBuf> {
        let bytes = creative_docx(report)?;
        self.write(CREATIVE_FILE_NAME, &bytes).await
    }

    /// 保存原始 JSON 报告
    pub async fn export_json<T: Serialize>(&self, file_name: &str, report: &T) -> AppResult<PathBuf> {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::Export(e.to_string()))?;
        self.write(file_name, text.as_bytes()).await
    }

    /// 写入输出目录（不存在则创建）
    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))?;

        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("📄 报告已保存至: {}", path.display());
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

// ========== 文档构建 ==========

const TITLE: &str = "Title";
const HEADING_1: &str = "Heading1";
const HEADING_2: &str = "Heading2";

/// 标题样式（Word 内置样式 id）
fn with_styles(docx: Docx) -> Docx {
    docx.add_style(Style::new(TITLE, StyleType::Paragraph).name("Title").size(56).bold())
        .add_style(Style::new(HEADING_1, StyleType::Paragraph).name("Heading 1").size(32).bold())
        .add_style(Style::new(HEADING_2, StyleType::Paragraph).name("Heading 2").size(26).bold())
}

fn title(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(TITLE)
        .align(AlignmentType::Center)
        .line_spacing(LineSpacing::new().after(400))
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(HEADING_1)
        .line_spacing(LineSpacing::new().before(400).after(200))
}

fn sub_heading(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(HEADING_2)
        .line_spacing(LineSpacing::new().before(200).after(100))
}

fn text(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn bullet(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(format!("• {}", text)))
}

/// 加粗标签 + 普通文本
fn labeled(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(label).bold())
        .add_run(Run::new().add_text(value))
}

fn pack(docx: Docx) -> AppResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| AppError::Export(e.to_string()))?;
    let bytes = buf.into_inner();
    debug!("文档大小: {} 字节", bytes.len());
    Ok(bytes)
}

/// 生成焦点小组 Word 报告
pub fn focus_group_docx(report: &FocusGroupReport) -> AppResult<Vec<u8>> {
    let mut docx = with_styles(Docx::new())
        .add_paragraph(title("Focus Group Insights Report"))
        .add_paragraph(heading("Executive Summary"))
        .add_paragraph(text(&report.executive_summary))
        .add_paragraph(heading("Evolution of Sentiment"))
        .add_paragraph(text(&report.sentiment_evolution))
        .add_paragraph(heading("Final Verdicts"))
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("Apply: {}", report.verdicts.apply))
                        .add_break(BreakType::TextWrapping),
                )
                .add_run(
                    Run::new()
                        .add_text(format!("On the Fence: {}", report.verdicts.fence))
                        .add_break(BreakType::TextWrapping),
                )
                .add_run(Run::new().add_text(format!("Hard No: {}", report.verdicts.reject))),
        )
        .add_paragraph(heading("Feature Sentiments"));

    for fs in &report.feature_sentiments {
        docx = docx.add_paragraph(labeled(
            &format!("• {}: ", fs.feature),
            &format!(
                "Positive ({}), Neutral ({}), Negative ({})",
                fs.positive, fs.neutral, fs.negative
            ),
        ));
    }

    docx = docx.add_paragraph(heading("Persona Breakdown"));
    for p in &report.personas {
        docx = docx
            .add_paragraph(sub_heading(&format!("{} - {}", p.name, p.verdict)))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Occupation: ").bold())
                    .add_run(Run::new().add_text(&p.occupation))
                    .add_run(Run::new().add_text(" | Location: ").bold())
                    .add_run(Run::new().add_text(&p.location))
                    .add_run(Run::new().add_text(" | Income: ").bold())
                    .add_run(Run::new().add_text(&p.income)),
            )
            .add_paragraph(labeled("Reason: ", &p.reason))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Quote: ").bold())
                    .add_run(Run::new().add_text(format!("\"{}\"", p.quote)).italic())
                    .line_spacing(LineSpacing::new().after(200)),
            );
    }

    docx = docx.add_paragraph(heading("Missed Opportunities & Recommendations"));
    for opp in &report.missed_opportunities {
        docx = docx.add_paragraph(bullet(opp));
    }

    pack(docx)
}

fn add_analysis(mut docx: Docx, label: &str, analysis: &CreativeAnalysis) -> Docx {
    docx = docx
        .add_paragraph(sub_heading(label))
        .add_paragraph(labeled("Appeal Score: ", &format!("{}/10", analysis.appeal_score)))
        .add_paragraph(labeled("Strengths", ""));
    for s in &analysis.strengths {
        docx = docx.add_paragraph(bullet(s));
    }
    docx = docx.add_paragraph(labeled("Weaknesses", ""));
    for w in &analysis.weaknesses {
        docx = docx.add_paragraph(bullet(w));
    }
    docx
}

/// 生成创意对比 Word 报告
pub fn creative_docx(report: &CreativeComparisonReport) -> AppResult<Vec<u8>> {
    let [a, b, none] = report.preference_chart();

    let mut docx = with_styles(Docx::new())
        .add_paragraph(title("Creative Comparison Report"))
        .add_paragraph(heading("Overall Winner"))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(&report.overall_winner).bold()))
        .add_paragraph(text(&report.summary))
        .add_paragraph(heading("Persona Preferences"))
        .add_paragraph(text(&format!(
            "{}: {} | {}: {} | {}: {} | Would apply: {}/{}",
            a.0,
            a.1,
            b.0,
            b.1,
            none.0,
            none.1,
            report.would_apply_count(),
            report.persona_preferences.len()
        )));

    docx = docx.add_paragraph(heading("Creative Analysis"));
    docx = add_analysis(docx, "Creative A", &report.creative_a_analysis);
    docx = add_analysis(docx, "Creative B", &report.creative_b_analysis);

    docx = docx.add_paragraph(heading("Persona Breakdown"));
    for pref in &report.persona_preferences {
        let apply = if pref.would_apply { "Would Apply" } else { "Would Not Apply" };
        docx = docx
            .add_paragraph(sub_heading(&format!(
                "{} - Prefers {}",
                pref.persona_name,
                pref.preferred_creative.label()
            )))
            .add_paragraph(labeled("Decision: ", apply))
            .add_paragraph(labeled("Reasoning: ", &pref.reasoning))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Quote: ").bold())
                    .add_run(Run::new().add_text(format!("\"{}\"", pref.quote)).italic())
                    .line_spacing(LineSpacing::new().after(200)),
            );
    }

    docx = docx.add_paragraph(heading("Recommendations"));
    for rec in &report.recommendations {
        docx = docx.add_paragraph(bullet(rec));
    }

    pack(docx)
}
