//! Prompt 模板与响应 schema
//!
//! 只负责"把输入变成发送给模型的内容"，不关心调用方式

pub mod creative;
pub mod focus_group;
pub mod schema;

use crate::models::PersonaDefinition;

pub use creative::build_creative_prompt;
pub use focus_group::build_focus_group_prompt;
pub use schema::{
    creative_comparison_schema, focus_group_schema, to_json_schema, validate, SchemaViolation,
};

/// 单个人设在 prompt 中的一行描述（序号从 1 开始）
pub fn persona_line(index: usize, p: &PersonaDefinition) -> String {
    format!(
        "{}. {} (Age: {}, Job: {}, Loc: {}, Income: {}, Personality: {}, Spending: {})",
        index + 1,
        p.name,
        p.age,
        p.occupation,
        p.location,
        p.income,
        p.personality,
        p.spending_habits
    )
}

/// 所有人设的列表，换行分隔
pub fn persona_list(personas: &[PersonaDefinition]) -> String {
    personas
        .iter()
        .enumerate()
        .map(|(i, p)| persona_line(i, p))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_personas;

    #[test]
    fn test_persona_line_format() {
        let personas = default_personas();
        assert_eq!(
            persona_line(0, &personas[0]),
            "1. Maria (Age: 42, Job: Agriculture Operations Manager, Loc: Fresno, CA, \
             Income: $85,000/year, Personality: Practical, budget-conscious, straightforward, \
             family-oriented., Spending: Spends heavily on gas for her truck commuting to farms, \
             and groceries for her family of four.)"
        );
    }

    #[test]
    fn test_persona_list_numbering() {
        let personas = default_personas();
        let list = persona_list(&personas[..3]);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("3. Chloe (Age: 20"));
    }
}
