//! System prompt for the support assistant.

use supportdesk_types::memory::RecalledMemory;

pub const SUPPORT_SYSTEM_PROMPT: &str = r#"You are a professional customer support assistant. Your role is to:

1. Answer customer questions clearly and accurately
2. Troubleshoot common issues with step-by-step guidance
3. Be empathetic, patient, and professional at all times
4. Create support tickets for complex issues that require follow-up
5. Check and provide ticket status when customers ask

Available Tools:
- create_support_ticket: Use when a customer has an issue that cannot be resolved immediately
- check_ticket_status: Use when customers ask about their ticket status

Guidelines:
- Maintain context from previous messages in the conversation
- If you remember the customer's name or previous issues, reference them naturally
- For urgent issues, set priority to "high" or "urgent"
- Always confirm ticket creation with the ticket ID
- Be concise but thorough in your responses"#;

/// The support prompt, followed by recalled facts when there are any.
pub fn build_system_prompt(memories: &[RecalledMemory]) -> String {
    if memories.is_empty() {
        return SUPPORT_SYSTEM_PROMPT.to_string();
    }

    let mut prompt = String::with_capacity(SUPPORT_SYSTEM_PROMPT.len() + 64 * memories.len());
    prompt.push_str(SUPPORT_SYSTEM_PROMPT);
    prompt.push_str("\n\nWhat you remember about this customer:");
    for memory in memories {
        prompt.push_str("\n- ");
        prompt.push_str(&memory.fact.content);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use supportdesk_types::memory::{MemoryCategory, MemoryFact};
    use uuid::Uuid;

    fn recalled(content: &str) -> RecalledMemory {
        RecalledMemory {
            fact: MemoryFact {
                id: Uuid::now_v7(),
                entity_id: "user_1".to_string(),
                process_id: "support_bot".to_string(),
                session_id: "s".to_string(),
                content: content.to_string(),
                category: MemoryCategory::Fact,
                importance: 3,
                created_at: Utc::now(),
            },
            similarity: 0.5,
        }
    }

    #[test]
    fn test_prompt_without_memories() {
        assert_eq!(build_system_prompt(&[]), SUPPORT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_prompt_lists_memories() {
        let prompt = build_system_prompt(&[
            recalled("Customer's name is Dana"),
            recalled("Customer is on the Pro plan"),
        ]);
        assert!(prompt.starts_with(SUPPORT_SYSTEM_PROMPT));
        assert!(prompt.ends_with(
            "What you remember about this customer:\n- Customer's name is Dana\n- Customer is on the Pro plan"
        ));
    }

    #[test]
    fn test_prompt_mentions_both_tools() {
        assert!(SUPPORT_SYSTEM_PROMPT.contains("create_support_ticket"));
        assert!(SUPPORT_SYSTEM_PROMPT.contains("check_ticket_status"));
    }
}
