//! `supportdesk memories`: show recalled facts for a user.

use anyhow::Result;
use console::style;
use serde_json::json;

use supportdesk_core::memory::service::MemoryService;
use supportdesk_core::memory::store::MemoryRepository;

use crate::http::handlers::memories::{DEFAULT_MEMORY_QUERY, PROFILE_MEMORY_LIMIT};

/// Print the facts remembered about `user_id`, ranked against `query`.
pub async fn show_memories<M: MemoryRepository>(
    memory: &MemoryService<M>,
    user_id: &str,
    query: Option<&str>,
    json: bool,
) -> Result<()> {
    let query = query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or(DEFAULT_MEMORY_QUERY);
    let attribution = memory.attribution(user_id);
    let recalled = memory
        .recall(&attribution, query, PROFILE_MEMORY_LIMIT, 0.0)
        .await?;

    if json {
        let items: Vec<_> = recalled
            .iter()
            .map(|m| {
                json!({
                    "content": m.fact.content,
                    "category": m.fact.category.to_string(),
                    "importance": m.fact.importance,
                    "similarity": (m.similarity * 1000.0).round() / 1000.0,
                })
            })
            .collect();
        let out = json!({"user_id": user_id, "memories": items});
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    if recalled.is_empty() {
        println!(
            "  {} Nothing remembered about {} yet.",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
        println!();
        return Ok(());
    }

    println!(
        "  {} What I remember about {}:",
        style("*").cyan().bold(),
        style(user_id).cyan().bold()
    );
    println!();
    for m in &recalled {
        println!(
            "  {} {} {}",
            style(format!("{:.3}", m.similarity)).dim(),
            m.fact.content,
            style(format!("[{}]", m.fact.category)).dim()
        );
    }
    println!();
    Ok(())
}
