//! 模型返回的结构化报告
//!
//! 字段名与响应 schema 保持一致（camelCase）

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// 单个人设的最终结论
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Apply,
    OnTheFence,
    HardNo,
    /// 模型给出了约定之外的标签，原样保留
    Unrecognized(String),
}

impl Verdict {
    pub fn label(&self) -> &str {
        match self {
            Verdict::Apply => "Apply",
            Verdict::OnTheFence => "On the Fence",
            Verdict::HardNo => "Hard No",
            Verdict::Unrecognized(s) => s,
        }
    }
}

impl From<String> for Verdict {
    fn from(s: String) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "apply" => Verdict::Apply,
            "onthefence" | "fence" => Verdict::OnTheFence,
            "hardno" | "reject" => Verdict::HardNo,
            _ => Verdict::Unrecognized(s),
        }
    }
}

impl From<Verdict> for String {
    fn from(v: Verdict) -> Self {
        v.label().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 计数字段：接受 `2` 与 `2.0`，拒绝负数和小数
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(de::Error::custom(format!(
            "expected a non-negative whole number, found {}",
            value
        )))
    }
}

/// 三类结论的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    #[serde(deserialize_with = "count")]
    pub apply: u32,
    #[serde(deserialize_with = "count")]
    pub fence: u32,
    #[serde(deserialize_with = "count")]
    pub reject: u32,
}

impl VerdictCounts {
    pub fn total(&self) -> u32 {
        self.apply + self.fence + self.reject
    }
}

/// 单个产品特性的情绪统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSentiment {
    pub feature: String,
    #[serde(deserialize_with = "count")]
    pub positive: u32,
    #[serde(deserialize_with = "count")]
    pub negative: u32,
    #[serde(deserialize_with = "count")]
    pub neutral: u32,
}

/// 单个人设卡片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaVerdict {
    pub name: String,
    pub occupation: String,
    pub location: String,
    pub income: String,
    pub verdict: Verdict,
    pub reason: String,
    pub quote: String,
}

/// 焦点小组报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusGroupReport {
    pub executive_summary: String,
    pub sentiment_evolution: String,
    pub verdicts: VerdictCounts,
    pub feature_sentiments: Vec<FeatureSentiment>,
    pub personas: Vec<PersonaVerdict>,
    pub missed_opportunities: Vec<String>,
}

impl FocusGroupReport {
    /// 结论分布图数据
    pub fn verdict_chart(&self) -> [(&'static str, u32); 3] {
        [
            ("Apply", self.verdicts.apply),
            ("On the Fence", self.verdicts.fence),
            ("Hard No", self.verdicts.reject),
        ]
    }

    /// 根据人设卡片重新统计结论
    pub fn tally_persona_verdicts(&self) -> VerdictCounts {
        self.personas
            .iter()
            .fold(VerdictCounts::default(), |mut acc, p| {
                match p.verdict {
                    Verdict::Apply => acc.apply += 1,
                    Verdict::OnTheFence => acc.fence += 1,
                    Verdict::HardNo => acc.reject += 1,
                    Verdict::Unrecognized(_) => {}
                }
                acc
            })
    }

    /// 汇总计数与人设卡片不一致时返回 (汇总, 卡片统计)
    pub fn verdict_mismatch(&self) -> Option<(VerdictCounts, VerdictCounts)> {
        let tallied = self.tally_persona_verdicts();
        (tallied != self.verdicts).then_some((self.verdicts, tallied))
    }
}

/// 创意对比中人设的偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreferredCreative {
    CreativeA,
    CreativeB,
    /// 两个都不喜欢，或模型给出了无法识别的值
    Neither,
}

impl PreferredCreative {
    pub fn label(&self) -> &'static str {
        match self {
            PreferredCreative::CreativeA => "Creative A",
            PreferredCreative::CreativeB => "Creative B",
            PreferredCreative::Neither => "None",
        }
    }
}

impl From<String> for PreferredCreative {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "creative a" | "a" => PreferredCreative::CreativeA,
            "creative b" | "b" => PreferredCreative::CreativeB,
            _ => PreferredCreative::Neither,
        }
    }
}

impl From<PreferredCreative> for String {
    fn from(p: PreferredCreative) -> Self {
        p.label().to_string()
    }
}

/// 单个创意的分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeAnalysis {
    /// 1-10 分
    pub appeal_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaPreference {
    pub persona_name: String,
    pub preferred_creative: PreferredCreative,
    pub would_apply: bool,
    pub reasoning: String,
    pub quote: String,
}

/// 创意对比报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeComparisonReport {
    pub overall_winner: String,
    pub summary: String,
    #[serde(rename = "creativeAAnalysis")]
    pub creative_a_analysis: CreativeAnalysis,
    #[serde(rename = "creativeBAnalysis")]
    pub creative_b_analysis: CreativeAnalysis,
    pub persona_preferences: Vec<PersonaPreference>,
    pub recommendations: Vec<String>,
}

impl CreativeComparisonReport {
    /// 偏好分布图数据
    pub fn preference_chart(&self) -> [(&'static str, usize); 3] {
        let count = |target: PreferredCreative| {
            self.persona_preferences
                .iter()
                .filter(|p| p.preferred_creative == target)
                .count()
        };
        [
            ("Creative A", count(PreferredCreative::CreativeA)),
            ("Creative B", count(PreferredCreative::CreativeB)),
            ("None", count(PreferredCreative::Neither)),
        ]
    }

    /// 表示会申请的人数
    pub fn would_apply_count(&self) -> usize {
        self.persona_preferences.iter().filter(|p| p.would_apply).count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn focus_group_json() -> Value {
        json!({
            "executiveSummary": "Gas and grocery earners like the card; students balk at the fee.",
            "sentimentEvolution": "Skepticism about the APR softened once the fee waiver came up.",
            "verdicts": { "apply": 1, "fence": 1, "reject": 1 },
            "featureSentiments": [
                { "feature": "4% Gas & EV", "positive": 2, "negative": 0, "neutral": 1 },
                { "feature": "APR", "positive": 0, "negative": 3, "neutral": 0 }
            ],
            "personas": [
                {
                    "name": "Maria", "occupation": "Agriculture Operations Manager",
                    "location": "Fresno, CA", "income": "$85,000/year",
                    "verdict": "Apply", "reason": "Gas rewards match her commute.",
                    "quote": "That 4% on gas pays for itself."
                },
                {
                    "name": "Carlos", "occupation": "Farm Field Supervisor",
                    "location": "Visalia, CA", "income": "$55,000/year",
                    "verdict": "On the Fence", "reason": "Worried about the APR.",
                    "quote": "I need to see the rate first."
                },
                {
                    "name": "Chloe", "occupation": "Marine Biology Student",
                    "location": "Santa Cruz, CA", "income": "$12,000/year",
                    "verdict": "Hard No", "reason": "Annual fee.",
                    "quote": "I don't pay to spend money."
                }
            ],
            "missedOpportunities": ["Student tier with no annual fee"]
        })
    }

    pub fn creative_json() -> Value {
        json!({
            "overallWinner": "Creative B",
            "summary": "B reads as more trustworthy.",
            "creativeAAnalysis": { "appealScore": 6, "strengths": ["Bold colors"], "weaknesses": ["Busy layout"] },
            "creativeBAnalysis": { "appealScore": 8.5, "strengths": ["Clear offer"], "weaknesses": ["Plain"] },
            "personaPreferences": [
                { "personaName": "Maria", "preferredCreative": "Creative B", "wouldApply": true,
                  "reasoning": "The cash back number is obvious.", "quote": "I get it right away." },
                { "personaName": "David", "preferredCreative": "Creative A", "wouldApply": true,
                  "reasoning": "Feels premium.", "quote": "Looks like a travel card." },
                { "personaName": "Robert", "preferredCreative": "Neither", "wouldApply": false,
                  "reasoning": "Too flashy.", "quote": "Not for me." }
            ],
            "recommendations": ["Lead with the $300 bonus"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::from("Hard No".to_string()), Verdict::HardNo);
        assert_eq!(Verdict::from("on the fence".to_string()), Verdict::OnTheFence);
        assert_eq!(Verdict::from("APPLY".to_string()), Verdict::Apply);
        assert_eq!(
            Verdict::from("Maybe later".to_string()),
            Verdict::Unrecognized("Maybe later".to_string())
        );
        assert_eq!(String::from(Verdict::OnTheFence), "On the Fence");
    }

    #[test]
    fn test_focus_group_report_deserializes() {
        let report: FocusGroupReport = serde_json::from_value(focus_group_json()).unwrap();
        assert_eq!(report.personas.len(), 3);
        assert_eq!(report.personas[2].verdict, Verdict::HardNo);
        assert_eq!(
            report.verdict_chart(),
            [("Apply", 1), ("On the Fence", 1), ("Hard No", 1)]
        );
        assert!(report.verdict_mismatch().is_none());

        // 序列化后保持原始字段名
        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["personas"][1]["verdict"], "On the Fence");
        assert!(back.get("executiveSummary").is_some());
    }

    #[test]
    fn test_verdict_mismatch_detected() {
        let mut report: FocusGroupReport = serde_json::from_value(focus_group_json()).unwrap();
        report.verdicts.apply = 5;
        let (claimed, tallied) = report.verdict_mismatch().unwrap();
        assert_eq!(claimed.apply, 5);
        assert_eq!(tallied.apply, 1);
    }

    #[test]
    fn test_creative_report_preference_chart() {
        let report: CreativeComparisonReport = serde_json::from_value(creative_json()).unwrap();
        assert_eq!(
            report.preference_chart(),
            [("Creative A", 1), ("Creative B", 1), ("None", 1)]
        );
        assert_eq!(report.would_apply_count(), 2);
        assert_eq!(report.creative_b_analysis.appeal_score, 8.5);
    }
}
