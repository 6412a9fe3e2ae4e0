//! 终端报告展示
//!
//! 把结构化报告渲染为纯文本：摘要、结论分布条形图、特性情绪表、人设卡片

use std::fmt::Write;

use crate::models::{CreativeAnalysis, CreativeComparisonReport, FocusGroupReport, PersonaDefinition};
use crate::workflow::ReportSource;

const BAR_WIDTH: usize = 30;

fn bar(value: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (value * BAR_WIDTH + max / 2) / max;
    "█".repeat(filled)
}

fn section(out: &mut String, name: &str) {
    let _ = writeln!(out, "\n{}\n{}", name, "─".repeat(60));
}

/// 渲染人设列表（personas 子命令）
pub fn render_roster(personas: &[PersonaDefinition]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Personas Active", personas.len());
    if personas.is_empty() {
        let _ = writeln!(out, "No personas loaded.");
    }
    for (i, p) in personas.iter().enumerate() {
        let _ = writeln!(out, "\n[{}] {}, {}", i, p.name, p.age);
        let _ = writeln!(out, "    {} • {}", p.occupation, p.location);
        let _ = writeln!(out, "    Income: {}", p.income);
        let _ = writeln!(out, "    Personality: {}", p.personality);
        let _ = writeln!(out, "    Habits: {}", p.spending_habits);
    }
    out
}

/// 渲染焦点小组报告
pub fn render_focus_group(report: &FocusGroupReport, source: ReportSource) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Focus Group Insights  (source: {})", source.label());
    let _ = writeln!(out, "{}", "=".repeat(60));

    section(&mut out, "Executive Summary");
    let _ = writeln!(out, "{}", report.executive_summary);

    section(&mut out, "Evolution of Sentiment");
    let _ = writeln!(out, "\"{}\"", report.sentiment_evolution);

    section(&mut out, "Final Verdicts");
    let chart = report.verdict_chart();
    let max = chart.iter().map(|(_, n)| *n as usize).max().unwrap_or(0);
    for (name, n) in chart {
        let _ = writeln!(out, "{:<13} {:>3} {}", name, n, bar(n as usize, max));
    }
    if let Some((claimed, tallied)) = report.verdict_mismatch() {
        let _ = writeln!(
            out,
            "(persona cards show Apply {} / On the Fence {} / Hard No {}; summary claims {} total)",
            tallied.apply,
            tallied.fence,
            tallied.reject,
            claimed.total()
        );
    }

    section(&mut out, "Feature Sentiments");
    let width = report
        .feature_sentiments
        .iter()
        .map(|f| f.feature.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);
    let _ = writeln!(out, "{:<width$}  {:>8} {:>8} {:>8}", "Feature", "Positive", "Neutral", "Negative", width = width);
    for f in &report.feature_sentiments {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8} {:>8} {:>8}",
            f.feature,
            f.positive,
            f.neutral,
            f.negative,
            width = width
        );
    }

    section(&mut out, "Persona Breakdown");
    for p in &report.personas {
        let _ = writeln!(out, "\n{} [{}]", p.name, p.verdict);
        let _ = writeln!(out, "  {} | {} | {}", p.occupation, p.location, p.income);
        let _ = writeln!(out, "  {}", p.reason);
        let _ = writeln!(out, "  \"{}\"", p.quote);
    }

    section(&mut out, "Missed Opportunities & Recommendations");
    for opp in &report.missed_opportunities {
        let _ = writeln!(out, "• {}", opp);
    }
    out
}

fn render_analysis(out: &mut String, label: &str, analysis: &CreativeAnalysis) {
    let _ = writeln!(out, "\n{}  Appeal Score: {}/10", label, analysis.appeal_score);
    let _ = writeln!(out, "  Strengths:");
    for s in &analysis.strengths {
        let _ = writeln!(out, "    + {}", s);
    }
    let _ = writeln!(out, "  Weaknesses:");
    for w in &analysis.weaknesses {
        let _ = writeln!(out, "    - {}", w);
    }
}

/// 渲染创意对比报告
pub fn render_creative(report: &CreativeComparisonReport, source: ReportSource) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Overall Winner: {}  (source: {})", report.overall_winner, source.label());
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "{}", report.summary);

    section(&mut out, "Creative Analysis");
    render_analysis(&mut out, "Creative A", &report.creative_a_analysis);
    render_analysis(&mut out, "Creative B", &report.creative_b_analysis);

    section(&mut out, "Persona Preferences");
    let chart = report.preference_chart();
    let max = chart.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (name, n) in chart {
        let _ = writeln!(out, "{:<11} {:>3} {}", name, n, bar(n, max));
    }
    for pref in &report.persona_preferences {
        let apply = if pref.would_apply { "Would Apply" } else { "Would Not Apply" };
        let _ = writeln!(
            out,
            "\n{} - Prefers {} ({})",
            pref.persona_name,
            pref.preferred_creative.label(),
            apply
        );
        let _ = writeln!(out, "  {}", pref.reasoning);
        let _ = writeln!(out, "  \"{}\"", pref.quote);
    }

    section(&mut out, "Recommendations");
    for rec in &report.recommendations {
        let _ = writeln!(out, "• {}", rec);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_personas;
    use crate::models::report::fixtures::{creative_json, focus_group_json};

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(5, 5).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 2).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_focus_group() {
        let report: FocusGroupReport = serde_json::from_value(focus_group_json()).unwrap();
        let text = render_focus_group(&report, ReportSource::DirectModel);
        assert!(text.contains("source: direct model call"));
        assert!(text.contains("Chloe [Hard No]"));
        assert!(text.contains("• Student tier with no annual fee"));
        assert!(!text.contains("persona cards show"));
    }

    #[test]
    fn test_render_creative() {
        let report: CreativeComparisonReport = serde_json::from_value(creative_json()).unwrap();
        let text = render_creative(&report, ReportSource::Backend);
        assert!(text.contains("Overall Winner: Creative B"));
        assert!(text.contains("Robert - Prefers None (Would Not Apply)"));
    }

    #[test]
    fn test_render_roster() {
        assert!(render_roster(&[]).contains("No personas loaded."));
        let text = render_roster(&default_personas());
        assert!(text.starts_with("8 Personas Active"));
        assert!(text.contains("[7] Robert, 68"));
    }
}
