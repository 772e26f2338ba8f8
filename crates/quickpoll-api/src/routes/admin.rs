use axum::{extract::State, Json};
use quickpoll_core::AppState;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AdminAccess;

/// Every poll with options and votes (including voter tokens), newest first.
pub async fn list_polls(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> Result<Json<Value>, ApiError> {
    let polls = quickpoll_core::poll::list_polls(&state.db).await?;
    let polls: Vec<_> = polls.iter().map(|p| p.to_model(true)).collect();
    Ok(Json(json!({ "polls": polls })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get_request, json_request, send, test_state, ADMIN_SECRET};
    use axum::http::StatusCode;
    use quickpoll_core::{AppConfig, AppState};
    use serde_json::json;

    fn admin_uri(secret: &str) -> String {
        let encoded: String = secret
            .chars()
            .map(|c| if c == ' ' { "%20".to_string() } else { c.to_string() })
            .collect();
        format!("/api/polls/admin?secret={encoded}")
    }

    #[tokio::test]
    async fn missing_or_wrong_secret_is_unauthorized() {
        let state = test_state().await;
        for uri in [
            "/api/polls/admin".to_string(),
            "/api/polls/admin?secret=".to_string(),
            admin_uri("wrong"),
            admin_uri("correct horse battery"),
        ] {
            let (status, body) = send(&state, get_request(&uri)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn unconfigured_secret_denies_everyone() {
        let state = test_state().await;
        let state = AppState::new(state.db.clone(), AppConfig::default());
        let (status, _) = send(&state, get_request("/api/polls/admin?secret=")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&state, get_request(&admin_uri("anything"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn lists_polls_newest_first_with_voter_tokens() {
        let state = test_state().await;
        let (_, older) = send(
            &state,
            json_request(
                "POST",
                "/api/polls",
                None,
                json!({ "question": "Older", "options": ["a", "b"] }),
            ),
        )
        .await;
        send(
            &state,
            json_request(
                "POST",
                "/api/polls",
                None,
                json!({ "question": "Newer", "options": ["c", "d"] }),
            ),
        )
        .await;
        send(
            &state,
            json_request(
                "PUT",
                "/api/polls",
                Some("203.0.113.7"),
                json!({ "pollId": older["id"], "optionId": older["options"][1]["id"] }),
            ),
        )
        .await;

        let (status, body) = send(&state, get_request(&admin_uri(ADMIN_SECRET))).await;
        assert_eq!(status, StatusCode::OK);
        let polls = body["polls"].as_array().unwrap();
        assert_eq!(polls.len(), 2);
        assert_eq!(polls[0]["title"], "Newer");
        assert_eq!(polls[1]["title"], "Older");
        assert_eq!(polls[1]["votes"][0]["voterToken"], "203.0.113.7");
        assert_eq!(polls[0]["votes"], json!([]));
    }
}
