use super::persona_list;
use crate::models::PersonaDefinition;

/// 构建创意对比的 prompt
///
/// 图片以附件形式随请求发送：第一张为 Creative A，第二张为 Creative B
pub fn build_creative_prompt(personas: &[PersonaDefinition]) -> String {
    let count = personas.len();
    format!(
        r#"
You are an expert market researcher and creative strategist.
I am running a synthetic focus group with {count} personas comparing two advertising creatives for a new credit card campaign.
The first attached image is "Creative A". The second attached image is "Creative B".

The Personas:
{personas}

Have each of these {count} personas look at both creatives and debate which one would make them more likely to apply for the card.
Then score each creative's overall appeal from 1 to 10, list its strengths and weaknesses, and record every persona's preferred creative
("Creative A", "Creative B" or "None"), whether they would apply, their reasoning, and a short quote in their own voice.
Name the overall winner and give concrete recommendations for improving the creatives.

Return the results strictly in the requested JSON format.
"#,
        count = count,
        personas = persona_list(personas),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_personas;

    #[test]
    fn test_creative_prompt_labels_images() {
        let personas = default_personas();
        let prompt = build_creative_prompt(&personas[..2]);
        assert!(prompt.contains("with 2 personas comparing two advertising creatives"));
        assert!(prompt.contains(r#"The first attached image is "Creative A""#));
        assert!(prompt.contains("2. Carlos (Age: 34"));
    }
}
