//! GET /api/memories/{user_id}: what the assistant remembers about a user.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use supportdesk_types::memory::RecalledMemory;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query used when the caller gives none.
pub const DEFAULT_MEMORY_QUERY: &str = "customer information";

/// Facts listed per profile request.
pub const PROFILE_MEMORY_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemoryItem {
    pub content: String,
    pub similarity: f64,
}

impl From<RecalledMemory> for MemoryItem {
    fn from(memory: RecalledMemory) -> Self {
        Self {
            content: memory.fact.content,
            similarity: round3(memory.similarity),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    pub user_id: String,
    pub memories: Vec<MemoryItem>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// GET /api/memories/{user_id}?query=
pub async fn get_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<MemoryQuery>,
) -> Result<Json<MemoriesResponse>, AppError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MEMORY_QUERY.to_string());

    let memory = state.chat_service.memory();
    let attribution = memory.attribution(&user_id);
    let recalled = memory
        .recall(&attribution, &query, PROFILE_MEMORY_LIMIT, 0.0)
        .await?;

    Ok(Json(MemoriesResponse {
        user_id,
        memories: recalled.into_iter().map(MemoryItem::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }
}
