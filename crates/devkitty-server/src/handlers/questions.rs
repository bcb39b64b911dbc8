//! Question handlers
//!
//! Validation happens here; the store accepts whatever it is given.

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Form, Json,
};
use devkitty_core::{Question, QuestionId, QuestionInput};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    questions: Vec<Question>,
    count: u64,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    question: Question,
}

pub async fn list(State(state): State<AppState>) -> Json<QuestionListResponse> {
    let questions = state.store.list().await;
    let count = questions.len() as u64;

    Json(QuestionListResponse { questions, count })
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<QuestionInput>,
) -> Result<(StatusCode, Json<QuestionResponse>), StatusCode> {
    if !input.is_complete() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let question = state
        .store
        .add(input.category.trim(), input.content.trim())
        .await;
    tracing::info!("Question added: {}", question.id);

    Ok((StatusCode::CREATED, Json(QuestionResponse { question })))
}

/// Form post from the question page; redirects back to it.
pub async fn create_from_form(
    State(state): State<AppState>,
    Form(input): Form<QuestionInput>,
) -> Result<Redirect, StatusCode> {
    if !input.is_complete() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let question = state
        .store
        .add(input.category.trim(), input.content.trim())
        .await;
    tracing::info!("Question added: {}", question.id);

    Ok(Redirect::to("/"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<QuestionInput>,
) -> StatusCode {
    if !input.is_complete() {
        return StatusCode::BAD_REQUEST;
    }

    state
        .store
        .update(
            &QuestionId::from(id),
            input.category.trim(),
            input.content.trim(),
        )
        .await;

    StatusCode::NO_CONTENT
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete(&QuestionId::from(id)).await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use crate::services::QuestionStore;
    use crate::storage::Resolution;
    use crate::{build_router, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<QuestionStore>) {
        let store = Arc::new(QuestionStore::new(Resolution::fallback()));
        let state = AppState {
            store: store.clone(),
        };
        (build_router(state, Path::new("public")), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (app, _store) = app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/questions",
                json!({ "category": "JavaScript", "content": "What is a closure?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["question"]["content"], "What is a closure?");

        let response = app
            .oneshot(Request::get("/api/questions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["questions"][0]["id"], created["question"]["id"]);
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let (app, store) = app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/questions",
                json!({ "category": "HTML", "content": "   " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_form_post_redirects_home() {
        let (app, store) = app();

        let response = app
            .oneshot(
                Request::post("/addQuestion")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("category=CSS&content=Explain+the+box+model%3F"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(store.list().await[0].content, "Explain the box model?");
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_ids_succeed() {
        let (app, store) = app();
        let question = store.add("React", "What is a hook?").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/questions/no-such-question",
                json!({ "category": "React", "content": "What is JSX?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/questions/no-such-question")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.list().await, vec![question.clone()]);

        let response = app
            .oneshot(
                Request::delete(format!("/api/questions/{}", question.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let (app, store) = app();
        let question = store.add("React", "What is a hook?").await;

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/questions/{}", question.id),
                json!({ "category": "React", "content": "What is JSX?" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let stored = store.list().await.remove(0);
        assert_eq!(stored.content, "What is JSX?");
        assert_eq!(stored.created_at, question.created_at);
    }

    #[tokio::test]
    async fn test_health_reports_fallback() {
        let (app, store) = app();
        store.add("Behavioral", "Tell me about yourself.").await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health = body_json(response).await;
        assert_eq!(health["mode"], "fallback");
        assert_eq!(health["count"], 1);
        assert!(health["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (app, _store) = app();

        let response = app
            .oneshot(
                Request::get("/definitely/not/here.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
