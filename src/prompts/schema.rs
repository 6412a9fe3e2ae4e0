//! 响应 schema
//!
//! 采用 Gemini `responseSchema` 的写法（大写类型名）。同一份 schema 同时用于：
//! - 发送给模型约束输出
//! - 校验模型返回的 JSON

use serde_json::{json, Map, Value};
use std::fmt;

/// 焦点小组报告的响应 schema
pub fn focus_group_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": { "type": "STRING", "description": "A high-level overview of the card's reception." },
            "sentimentEvolution": { "type": "STRING", "description": "How opinions changed during the debate." },
            "verdicts": {
                "type": "OBJECT",
                "properties": {
                    "apply": { "type": "INTEGER", "minimum": 0 },
                    "fence": { "type": "INTEGER", "minimum": 0 },
                    "reject": { "type": "INTEGER", "minimum": 0 }
                },
                "required": ["apply", "fence", "reject"]
            },
            "featureSentiments": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "feature": { "type": "STRING" },
                        "positive": { "type": "INTEGER", "minimum": 0 },
                        "negative": { "type": "INTEGER", "minimum": 0 },
                        "neutral": { "type": "INTEGER", "minimum": 0 }
                    },
                    "required": ["feature", "positive", "negative", "neutral"]
                }
            },
            "personas": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "occupation": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "income": { "type": "STRING" },
                        "verdict": { "type": "STRING", "description": "Must be 'Apply', 'Hard No', or 'On the Fence'" },
                        "reason": { "type": "STRING" },
                        "quote": { "type": "STRING" }
                    },
                    "required": ["name", "occupation", "location", "income", "verdict", "reason", "quote"]
                }
            },
            "missedOpportunities": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["executiveSummary", "sentimentEvolution", "verdicts", "featureSentiments", "personas", "missedOpportunities"]
    })
}

fn creative_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "appealScore": { "type": "NUMBER", "description": "Overall appeal from 1 to 10." },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["appealScore", "strengths", "weaknesses"]
    })
}

/// 创意对比报告的响应 schema
pub fn creative_comparison_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallWinner": { "type": "STRING", "description": "'Creative A', 'Creative B', or 'Tie'" },
            "summary": { "type": "STRING" },
            "creativeAAnalysis": creative_analysis_schema(),
            "creativeBAnalysis": creative_analysis_schema(),
            "personaPreferences": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "personaName": { "type": "STRING" },
                        "preferredCreative": { "type": "STRING", "description": "Must be 'Creative A', 'Creative B', or 'None'" },
                        "wouldApply": { "type": "BOOLEAN" },
                        "reasoning": { "type": "STRING" },
                        "quote": { "type": "STRING" }
                    },
                    "required": ["personaName", "preferredCreative", "wouldApply", "reasoning", "quote"]
                }
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["overallWinner", "summary", "creativeAAnalysis", "creativeBAnalysis", "personaPreferences", "recommendations"]
    })
}

/// 单条校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// 形如 `$.personas[2].verdict`
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// 按 schema 校验 JSON，返回全部违规项（空表示通过）
pub fn validate(value: &Value, schema: &Value) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    validate_at("$", value, schema, &mut violations);
    violations
}

fn validate_at(path: &str, value: &Value, schema: &Value, out: &mut Vec<SchemaViolation>) {
    let mut push = |message: String| {
        out.push(SchemaViolation {
            path: path.to_string(),
            message,
        })
    };

    let expected = schema
        .get("type")
        .and_then(Value::as_str)
        .map(|t| t.to_ascii_uppercase());

    // 无类型声明的节点不做约束
    let Some(expected) = expected else {
        return;
    };

    if value.is_null() && schema.get("nullable").and_then(Value::as_bool) == Some(true) {
        return;
    }

    let type_ok = match expected.as_str() {
        "OBJECT" => value.is_object(),
        "ARRAY" => value.is_array(),
        "STRING" => value.is_string(),
        "INTEGER" => value.is_i64() || value.is_u64() || is_whole_float(value),
        "NUMBER" => value.is_number(),
        "BOOLEAN" => value.is_boolean(),
        _ => true,
    };
    if !type_ok {
        push(format!("expected {}, found {}", expected, kind_of(value)));
        return;
    }

    if let (Some(min), Some(n)) = (schema.get("minimum").and_then(Value::as_f64), value.as_f64()) {
        if n < min {
            push(format!("{} is less than minimum {}", value, min));
        }
    }

    if let (Some(allowed), Some(s)) = (schema.get("enum").and_then(Value::as_array), value.as_str()) {
        if !allowed.iter().any(|a| a.as_str() == Some(s)) {
            push(format!("'{}' is not one of the allowed values", s));
        }
    }

    match (expected.as_str(), value) {
        ("OBJECT", Value::Object(obj)) => {
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for key in required.iter().filter_map(Value::as_str) {
                    if !obj.contains_key(key) {
                        out.push(SchemaViolation {
                            path: format!("{}.{}", path, key),
                            message: "missing required field".to_string(),
                        });
                    }
                }
            }
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                for (key, prop_schema) in props {
                    if let Some(child) = obj.get(key) {
                        validate_at(&format!("{}.{}", path, key), child, prop_schema, out);
                    }
                }
            }
        }
        ("ARRAY", Value::Array(children)) => {
            if let Some(items) = schema.get("items") {
                for (i, child) in children.iter().enumerate() {
                    validate_at(&format!("{}[{}]", path, i), child, items, out);
                }
            }
        }
        _ => {}
    }
}

fn is_whole_float(value: &Value) -> bool {
    value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 转成标准 JSON Schema（小写类型名），供 OpenAI 兼容接口使用
pub fn to_json_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .iter()
                .map(|(k, v)| {
                    let v = match (k.as_str(), v) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_lowercase()),
                        // properties 的键是字段名，不能当作 schema 关键字处理
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, s)| (name.clone(), to_json_schema(s)))
                                .collect(),
                        ),
                        _ => to_json_schema(v),
                    };
                    (k.clone(), v)
                })
                .collect();
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::fixtures::{creative_json, focus_group_json};

    #[test]
    fn test_valid_reports_pass() {
        assert!(validate(&focus_group_json(), &focus_group_schema()).is_empty());
        assert!(validate(&creative_json(), &creative_comparison_schema()).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut report = focus_group_json();
        report.as_object_mut().unwrap().remove("verdicts");
        report["personas"][1].as_object_mut().unwrap().remove("quote");

        let violations = validate(&report, &focus_group_schema());
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["$.verdicts", "$.personas[1].quote"]);
        assert_eq!(violations[0].message, "missing required field");
    }

    #[test]
    fn test_wrong_types() {
        let mut report = focus_group_json();
        report["verdicts"]["apply"] = json!("three");
        report["missedOpportunities"] = json!("none");

        let violations = validate(&report, &focus_group_schema());
        assert!(violations.contains(&SchemaViolation {
            path: "$.verdicts.apply".into(),
            message: "expected INTEGER, found string".into(),
        }));
        assert!(violations.contains(&SchemaViolation {
            path: "$.missedOpportunities".into(),
            message: "expected ARRAY, found string".into(),
        }));
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let schema = json!({ "type": "INTEGER" });
        assert!(validate(&json!(3.0), &schema).is_empty());
        assert_eq!(validate(&json!(3.5), &schema).len(), 1);
    }

    #[test]
    fn test_negative_counts_rejected() {
        let mut report = focus_group_json();
        report["verdicts"]["apply"] = json!(-1);
        report["featureSentiments"][0]["positive"] = json!(2.0);

        let violations = validate(&report, &focus_group_schema());
        assert_eq!(
            violations,
            vec![SchemaViolation {
                path: "$.verdicts.apply".into(),
                message: "-1 is less than minimum 0".into(),
            }]
        );
    }

    #[test]
    fn test_enum_constraint() {
        let schema = json!({ "type": "STRING", "enum": ["Apply", "Hard No"] });
        assert!(validate(&json!("Apply"), &schema).is_empty());
        assert_eq!(
            validate(&json!("Maybe"), &schema)[0].message,
            "'Maybe' is not one of the allowed values"
        );
    }

    #[test]
    fn test_to_json_schema_lowercases_types_only() {
        let converted = to_json_schema(&focus_group_schema());
        assert_eq!(converted["type"], "object");
        assert_eq!(converted["properties"]["verdicts"]["properties"]["apply"]["type"], "integer");
        // 名为 type 的字段不会被误改
        let schema = json!({ "type": "OBJECT", "properties": { "type": { "type": "STRING" } } });
        assert_eq!(to_json_schema(&schema)["properties"]["type"]["type"], "string");
    }
}
