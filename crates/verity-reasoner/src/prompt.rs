//! Prompt construction for claim analysis

use verity_domain::ReasoningRequest;

const INSTRUCTIONS: &str = "You are a fact-checking assistant. Analyze the statement below \
and judge whether it is accurate.";

const OUTPUT_FORMAT: &str = r#"Respond with a single JSON object and nothing else:
{"verdict": "true|false|misleading|unverified", "confidence": 0.0-1.0, "explanation": "brief explanation", "red_flags": ["..."]}

Use: true (accurate), false (inaccurate), misleading (partially true or missing context), unverified (cannot determine)."#;

/// Builds the prompt sent to every model in the chain
pub struct PromptBuilder<'a> {
    request: &'a ReasoningRequest,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for a request
    pub fn new(request: &'a ReasoningRequest) -> Self {
        Self { request }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Statement:\n---\n");
        prompt.push_str(self.request.claim.trim());
        prompt.push_str("\n---\n\n");

        let context = &self.request.context;
        if let Some(source_url) = &context.source_url {
            prompt.push_str(&format!("The statement was published at: {}\n", source_url));
        }
        if !context.source_flags.is_empty() {
            prompt.push_str(&format!(
                "Warning signs in that URL: {}\n",
                context.source_flags.join(", ")
            ));
        }
        if let Some(image_url) = &context.image_url {
            prompt.push_str(&format!(
                "The statement was shared together with this image: {}\n",
                image_url
            ));
        }
        if !context.is_empty() {
            prompt.push('\n');
        }

        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str(&format!(
            "\nWrite the explanation in {}.",
            language_name(&self.request.language)
        ));

        prompt
    }
}

/// Human-readable name for a language tag, defaulting to English
pub fn language_name(tag: &str) -> &'static str {
    match tag {
        "ta" => "Tamil",
        "hi" => "Hindi",
        "te" => "Telugu",
        "ml" => "Malayalam",
        "kn" => "Kannada",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::ReasoningContext;

    #[test]
    fn test_prompt_contains_claim_and_format() {
        let request = ReasoningRequest::new("  Moon landing was faked ", "en");
        let prompt = PromptBuilder::new(&request).build();

        assert!(prompt.contains("---\nMoon landing was faked\n---"));
        assert!(prompt.contains("\"verdict\""));
        assert!(prompt.contains("red_flags"));
        assert!(prompt.ends_with("in English."));
        assert!(!prompt.contains("published at"));
    }

    #[test]
    fn test_prompt_language() {
        let request = ReasoningRequest::new("claim", "ta");
        assert!(PromptBuilder::new(&request).build().ends_with("in Tamil."));
        assert_eq!(language_name("xx"), "English");
    }

    #[test]
    fn test_prompt_includes_context() {
        let request = ReasoningRequest::new("claim", "en").with_context(ReasoningContext {
            image_url: Some("https://img.example/1.jpg".to_string()),
            source_url: Some("https://news.example/a".to_string()),
            source_flags: Vec::new(),
        });
        let prompt = PromptBuilder::new(&request).build();
        assert!(prompt.contains("published at: https://news.example/a"));
        assert!(prompt.contains("this image: https://img.example/1.jpg"));
        assert!(!prompt.contains("Warning signs"));
    }

    #[test]
    fn test_prompt_lists_source_flags() {
        let request = ReasoningRequest::new("claim", "en").with_context(ReasoningContext {
            source_url: Some("http://bit.ly/free-prize".to_string()),
            source_flags: vec!["url shortener".to_string(), "suspicious words".to_string()],
            ..Default::default()
        });
        let prompt = PromptBuilder::new(&request).build();
        assert!(prompt.contains("Warning signs in that URL: url shortener, suspicious words"));
    }
}
