use super::persona_list;
use crate::models::PersonaDefinition;

/// 构建焦点小组模拟的 prompt
pub fn build_focus_group_prompt(campaign_pitch: &str, personas: &[PersonaDefinition]) -> String {
    let count = personas.len();
    format!(
        r#"
You are an expert market researcher and data extractor.
I am running a synthetic focus group with {count} personas testing a new credit card campaign.

The Personas:
{personas}

The Campaign Pitch:
{pitch}

Simulate a deep, multi-turn debate among these {count} personas about this exact campaign.
Then, extract the final insights and return them strictly in the requested JSON format.

Ensure the data reflects realistic demographic reactions based on the persona definitions provided.
"#,
        count = count,
        personas = persona_list(personas),
        pitch = campaign_pitch.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_personas;

    #[test]
    fn test_prompt_mentions_count_and_pitch() {
        let personas = default_personas();
        let prompt = build_focus_group_prompt("  Zero fee forever.  ", &personas);

        assert!(prompt.contains("synthetic focus group with 8 personas"));
        assert!(prompt.contains("debate among these 8 personas"));
        assert!(prompt.contains("The Campaign Pitch:\nZero fee forever.\n"));
        assert!(prompt.contains("8. Robert (Age: 68"));
    }
}
