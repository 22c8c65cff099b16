/// The instruction used for normalizing an OCR'd facts panel.
///
/// The template is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro; `{facts}` marks where the panel text goes.
pub const NORMALIZER_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

const FACTS_PLACEHOLDER: &str = "{facts}";

/// Build the user prompt for the given facts panel lines
pub fn build_normalizer_prompt(facts: &[String]) -> String {
    NORMALIZER_PROMPT_TEMPLATE.replace(FACTS_PLACEHOLDER, &facts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!NORMALIZER_PROMPT_TEMPLATE.is_empty());
        assert!(NORMALIZER_PROMPT_TEMPLATE.contains(FACTS_PLACEHOLDER));

        // The reply schema and the zero-value rule must be spelled out
        assert!(NORMALIZER_PROMPT_TEMPLATE.contains("'Nutritional Info'"));
        assert!(NORMALIZER_PROMPT_TEMPLATE.contains("'Other Ingredients'"));
        assert!(NORMALIZER_PROMPT_TEMPLATE.contains("0 as a value"));
        assert!(NORMALIZER_PROMPT_TEMPLATE.contains("OCR errors"));
    }

    #[test]
    fn test_build_prompt_joins_facts_with_newlines() {
        let facts = vec![
            "Supplement Facts".to_string(),
            "Vitamin D 0mcg".to_string(),
        ];
        let prompt = build_normalizer_prompt(&facts);

        assert!(prompt.contains("Facts:\nSupplement Facts\nVitamin D 0mcg\n"));
        assert!(!prompt.contains(FACTS_PLACEHOLDER));
    }

    #[test]
    fn test_build_prompt_with_no_facts() {
        let prompt = build_normalizer_prompt(&[]);
        assert!(prompt.contains("Facts:\n\n"));
    }
}
