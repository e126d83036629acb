//! Memory extraction via LLM.
//!
//! `MemoryExtractor` asks the model which facts from a support exchange are
//! worth remembering about the customer and returns them as `MemoryFact`s
//! with category and importance.
//!
//! Unparseable output logs a warning and yields no facts.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use supportdesk_types::llm::{CompletionRequest, LlmError, Message};
use supportdesk_types::memory::{Attribution, MemoryCategory, MemoryFact};

use crate::llm::box_provider::BoxLlmProvider;

/// System prompt for the memory extraction call.
const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a memory extraction assistant for a customer support team. Extract facts about the customer from the conversation that would help support agents in future conversations.

Rules:
1. Extract ONLY information worth remembering across sessions
2. Each fact must be a single, self-contained sentence about the customer
3. Do NOT include greetings, pleasantries, or trivial exchanges
4. Do NOT restate the assistant's generic advice
5. Include the customer's name, account details, products, and plans if mentioned
6. Include problems the customer reported and tickets that were opened
7. Include preferences (contact channel, language, tone) and corrections

Return a JSON array. Each element must have exactly these fields:
- "fact": string (one sentence, the key point)
- "category": string (one of: "preference", "fact", "decision", "context", "correction")
- "importance": integer (1-5, where 5 = critical to remember)

If there is nothing worth extracting, return an empty array: []

Example output:
[
  {"fact": "Customer's name is Dana and they are on the Pro plan", "category": "fact", "importance": 5},
  {"fact": "Customer prefers to be contacted by email", "category": "preference", "importance": 4},
  {"fact": "Customer reported being charged twice for the March invoice", "category": "context", "importance": 4}
]"#;

/// Fact as returned by the model before conversion to `MemoryFact`.
#[derive(Debug, Deserialize)]
struct RawFact {
    fact: String,
    category: String,
    importance: i64,
}

/// Stateless utility that turns a conversation exchange into facts.
pub struct MemoryExtractor;

impl MemoryExtractor {
    /// Extract facts from one user/assistant exchange.
    ///
    /// Sends the exchange at temperature 0.0 and parses the JSON reply.
    /// Unknown categories are dropped and importance is clamped to 1..=5.
    #[tracing::instrument(
        name = "extract_memory",
        skip(provider, user_text, assistant_text),
        fields(
            entity_id = %attribution.entity_id,
            session_id = %session_id,
        )
    )]
    pub async fn extract(
        provider: &BoxLlmProvider,
        attribution: &Attribution,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Vec<MemoryFact>, LlmError> {
        if user_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut request = CompletionRequest::new(
            "",
            Some(EXTRACTION_SYSTEM_PROMPT.to_string()),
            vec![
                Message::user(format!("Customer: {user_text}")),
                Message::assistant(format!("Support assistant: {assistant_text}")),
                Message::user("Extract the facts worth remembering from the exchange above."),
            ],
        );
        request.temperature = Some(0.0);
        request.max_tokens = Some(1024);

        let response = provider.complete(&request).await?;
        Ok(parse_facts(&response.content, attribution, session_id))
    }
}

/// Parse the model's JSON array, tolerating a surrounding code fence.
fn parse_facts(content: &str, attribution: &Attribution, session_id: &str) -> Vec<MemoryFact> {
    let raw_content = strip_code_fence(content.trim());

    let raw_facts: Vec<RawFact> = match serde_json::from_str(raw_content) {
        Ok(facts) => facts,
        Err(e) => {
            let preview: String = raw_content.chars().take(200).collect();
            tracing::warn!(
                error = %e,
                content_preview = %preview,
                "Failed to parse memory extraction JSON; returning empty result"
            );
            return Vec::new();
        }
    };

    raw_facts
        .into_iter()
        .filter_map(|raw| {
            if raw.fact.trim().is_empty() {
                return None;
            }
            let category: MemoryCategory = match raw.category.parse() {
                Ok(category) => category,
                Err(_) => {
                    tracing::warn!(
                        category = %raw.category,
                        fact = %raw.fact,
                        "Unknown memory category from LLM; skipping entry"
                    );
                    return None;
                }
            };

            Some(MemoryFact {
                id: Uuid::now_v7(),
                entity_id: attribution.entity_id.clone(),
                process_id: attribution.process_id.clone(),
                session_id: session_id.to_string(),
                content: raw.fact.trim().to_string(),
                category,
                importance: raw.importance.clamp(1, 5) as u8,
                created_at: Utc::now(),
            })
        })
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    fn attribution() -> Attribution {
        Attribution::new("user_1", "support_bot")
    }

    #[test]
    fn test_parse_facts() {
        let json = r#"[
            {"fact": "Customer prefers email", "category": "preference", "importance": 4},
            {"fact": "Customer's name is Dana", "category": "Fact", "importance": 9}
        ]"#;
        let facts = parse_facts(json, &attribution(), "session_a");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].category, MemoryCategory::Preference);
        assert_eq!(facts[1].category, MemoryCategory::Fact);
        assert_eq!(facts[1].importance, 5);
        assert_eq!(facts[0].entity_id, "user_1");
        assert_eq!(facts[0].session_id, "session_a");
    }

    #[test]
    fn test_parse_facts_skips_unknown_category_and_clamps_low() {
        let json = r#"[
            {"fact": "Something odd", "category": "gossip", "importance": 3},
            {"fact": "Customer uses Linux", "category": "context", "importance": -2}
        ]"#;
        let facts = parse_facts(json, &attribution(), "s");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].content, "Customer uses Linux");
        assert_eq!(facts[0].importance, 1);
    }

    #[test]
    fn test_parse_facts_tolerates_code_fence() {
        let content = "```json\n[{\"fact\": \"Customer is on the Pro plan\", \"category\": \"fact\", \"importance\": 3}]\n```";
        let facts = parse_facts(content, &attribution(), "s");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].content, "Customer is on the Pro plan");
    }

    #[test]
    fn test_parse_facts_invalid_json_is_empty() {
        assert!(parse_facts("Sure! Here are the facts:", &attribution(), "s").is_empty());
        assert!(parse_facts("[]", &attribution(), "s").is_empty());
    }

    #[test]
    fn test_extraction_prompt_contains_key_instructions() {
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("Extract ONLY information worth remembering across sessions"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("\"importance\""));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("empty array: []"));
    }

    #[tokio::test]
    async fn test_extract_calls_provider_deterministically() {
        let scripted = ScriptedProvider::with_texts(&[
            r#"[{"fact": "Customer's order 1234 arrived damaged", "category": "context", "importance": 4}]"#,
        ]);
        let requests = scripted.requests();
        let provider = BoxLlmProvider::new(scripted);

        let facts = MemoryExtractor::extract(
            &provider,
            &attribution(),
            "session_a",
            "My order 1234 arrived damaged",
            "Sorry to hear that, I've opened a ticket.",
        )
        .await
        .unwrap();

        assert_eq!(facts.len(), 1);
        let sent = requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].temperature, Some(0.0));
        assert!(sent[0].tools.is_empty());
        assert!(sent[0].messages[0].content.contains("order 1234"));
    }

    #[tokio::test]
    async fn test_extract_skips_blank_input() {
        let provider = BoxLlmProvider::new(ScriptedProvider::with_texts(&[]));
        let facts = MemoryExtractor::extract(&provider, &attribution(), "s", "  ", "hi")
            .await
            .unwrap();
        assert!(facts.is_empty());
    }
}
