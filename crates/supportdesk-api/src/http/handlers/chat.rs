//! POST /api/chat: one support conversation turn.

use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};

use supportdesk_types::chat::ChatRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// Cookie remembering the browser's user id.
pub const USER_COOKIE: &str = "support_user_id";

/// One year, in seconds.
const USER_COOKIE_MAX_AGE: u64 = 31_536_000;

/// `Set-Cookie` value for the user id. Readable by page scripts.
pub fn user_cookie(user_id: &str) -> String {
    format!("{USER_COOKIE}={user_id}; Max-Age={USER_COOKIE_MAX_AGE}; Path=/; SameSite=Lax")
}

/// Whether `value` is made only of RFC 6265 cookie-octets.
fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    if !is_cookie_value(body.user_id()) {
        return Err(AppError::Validation(
            "user_id may only contain printable ASCII without spaces, quotes, commas, semicolons or backslashes"
                .to_string(),
        ));
    }

    let cookie = user_cookie(body.user_id());
    let response = state.chat_service.chat(&body).await?;

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_cookie_attributes() {
        assert_eq!(
            user_cookie("user_42"),
            "support_user_id=user_42; Max-Age=31536000; Path=/; SameSite=Lax"
        );
        assert!(!user_cookie("user_42").contains("HttpOnly"));
    }

    #[test]
    fn test_cookie_value_octets() {
        assert!(is_cookie_value("user_42"));
        assert!(is_cookie_value("anonymous"));
        assert!(is_cookie_value("a.b-c@example.com"));
        assert!(!is_cookie_value("bob; Domain=evil.example"));
        assert!(!is_cookie_value("bob\nX-Evil: 1"));
        assert!(!is_cookie_value("two words"));
        assert!(!is_cookie_value("quo\"te"));
        assert!(!is_cookie_value("a,b"));
        assert!(!is_cookie_value("back\\slash"));
        assert!(!is_cookie_value("caf\u{e9}"));
    }
}
