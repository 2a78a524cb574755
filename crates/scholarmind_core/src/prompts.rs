//! crates/scholarmind_core/src/prompts.rs
//!
//! Fixed prompt templates for every generation call the assistant makes.
//! The wording is a compatibility contract: downstream parsing (numbered
//! lists, `Topic: Description` pairs) depends on the formats requested here,
//! so template changes must be coordinated with `parse`.

use crate::domain::ContentType;

const QUESTIONS_TEMPLATE: &str = r#"Suggest 3 research questions on: '{topic}'
Format as markdown bullet points"#;

const LITERATURE_TEMPLATE: &str = r#"Write a detailed literature review (400-500 words) on: "{topic}".
Include 5 relevant papers with summaries, overall findings, and research gaps.
Use markdown formatting with headings and bullet points."#;

const FUTURE_TEMPLATE: &str = r#"List 5 future research directions for: '{topic}'
Format as markdown bullet points"#;

const REFERENCES_TEMPLATE: &str = r#"Provide 5 APA-style references for papers related to: '{topic}'
Format as numbered list"#;

const ABSTRACT_TEMPLATE: &str = r#"Write a formal academic abstract (150-200 words) for: '{topic}'
Use professional academic language"#;

const ANALYSIS_TEMPLATE: &str = r#"Generate exactly 5 sub-topics related to: '{topic}'.
Format as:
1. Sub-topic description
2. Sub-topic description
3. Sub-topic description
4. Sub-topic description
5. Sub-topic description
Return only the numbered list, nothing else."#;

/// Prompt for the trending-topics list. Takes no topic; the response is
/// parsed as `Topic: Description` lines.
pub const TRENDING_PROMPT: &str = r#"Generate exactly 5 trending academic research topics with brief descriptions.
Format as:
1. Topic: Description (max 20 words)
2. Topic: Description (max 20 words)
3. Topic: Description (max 20 words)
4. Topic: Description (max 20 words)
5. Topic: Description (max 20 words)
Return only the numbered list, nothing else."#;

/// Renders the prompt for one content type by substituting the locked topic
/// into its fixed template.
pub fn render(content_type: ContentType, topic: &str) -> String {
    let template = match content_type {
        ContentType::Questions => QUESTIONS_TEMPLATE,
        ContentType::Literature => LITERATURE_TEMPLATE,
        ContentType::Future => FUTURE_TEMPLATE,
        ContentType::References => REFERENCES_TEMPLATE,
        ContentType::Abstract => ABSTRACT_TEMPLATE,
        ContentType::Analysis => ANALYSIS_TEMPLATE,
    };
    template.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_embeds_the_topic() {
        for content_type in ContentType::ALL {
            let prompt = render(content_type, "Coral Reef Restoration");
            assert!(
                prompt.contains("Coral Reef Restoration"),
                "{} prompt did not embed the topic",
                content_type
            );
            assert!(
                !prompt.contains("{topic}"),
                "{} prompt left the placeholder behind",
                content_type
            );
        }
    }

    #[test]
    fn analysis_prompt_requests_a_bare_numbered_list() {
        let prompt = render(ContentType::Analysis, "Soil Microbiomes");
        assert!(prompt.starts_with("Generate exactly 5 sub-topics"));
        assert!(prompt.ends_with("Return only the numbered list, nothing else."));
    }

    #[test]
    fn trending_prompt_requests_topic_description_pairs() {
        assert!(TRENDING_PROMPT.contains("1. Topic: Description (max 20 words)"));
        assert!(TRENDING_PROMPT.contains("5. Topic: Description (max 20 words)"));
    }
}
