//! Prompt templates for ranking and answer synthesis

use std::collections::HashMap;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fill in the template in one left-to-right pass. Substituted values
    /// are never rescanned; unknown placeholders are left as-is.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, String>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                break;
            };
            result.push_str(&rest[..open]);
            match values.get(after[..close].trim()) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after[close + 2..];
        }

        result.push_str(rest);
        result
    }
}

/// Standard RAG prompt templates
pub struct RagPrompts;

impl RagPrompts {
    /// Listwise ranking prompt; the model must answer with a JSON index array
    #[must_use]
    pub fn rank() -> PromptTemplate {
        PromptTemplate::new(
            "Rank by relevance to: \"{{query}}\"\n\
             Return ONLY JSON array of indices [2,0,...]\n\n\
             {{candidates}}",
        )
    }

    /// Grounded answer over numbered snippets
    #[must_use]
    pub fn answer() -> PromptTemplate {
        PromptTemplate::new(
            r"You answer questions using only the discussion snippets below. They are excerpts from public social media posts and comments, ordered by relevance.

{{context}}

Question: {{question}}

Instructions:
1. Base the answer on the snippets; cite them by number like [1] where useful
2. When snippets disagree, summarize the range of opinions
3. If the snippets do not contain the answer, say so plainly
4. Be concise but informative

Answer:",
        )
    }
}
