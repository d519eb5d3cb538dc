// REST API routes for the local HTTP server
// Every handler is a thin wrapper over a command; errors map to status codes here.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ServerState;
use crate::ai::GenreBrief;
use crate::commands::{brief, genre};
use crate::error::{BriefError, CatalogError, CommandError, SessionError};
use crate::session::SessionState;

// ---- Request/Response types ----

#[derive(Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub model: String,
    pub web_search: bool,
}

#[derive(Deserialize)]
pub struct GenreQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct AddGenreRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct AddGenreResponse {
    pub name: String,
}

#[derive(Deserialize)]
pub struct BriefRequest {
    pub genre: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// Command error rendered as a JSON error body
pub struct ApiError(CommandError);

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            CommandError::EmptyGenre => (StatusCode::BAD_REQUEST, "empty_genre"),
            CommandError::Brief(e @ BriefError::ServiceCallFailure(_)) => {
                (StatusCode::BAD_GATEWAY, e.kind())
            }
            CommandError::Brief(e @ BriefError::InvalidResponseFormat { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.kind())
            }
            CommandError::Catalog(CatalogError::Empty) => (StatusCode::BAD_REQUEST, "empty_genre"),
            CommandError::Catalog(CatalogError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "duplicate_genre")
            }
            CommandError::Session(SessionError::NoBrief) => (StatusCode::NOT_FOUND, "no_brief"),
            CommandError::Session(_) => (StatusCode::CONFLICT, "session_conflict"),
            CommandError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

// ---- Route registration ----

pub fn api_routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/genres", get(get_genres).post(add_genre))
        .route("/api/session", get(get_session))
        .route("/api/brief", post(generate_brief))
        .route("/api/brief/regenerate", post(regenerate_brief))
        .route("/api/brief/copy", get(get_brief_copy))
}

// ---- Handlers ----

async fn get_status(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: "Genre Harvester".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.app.config.model.clone(),
        web_search: state.app.config.web_search,
    })
}

async fn get_genres(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<GenreQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(genre::list_genres(&state.app, params.q.as_deref())?))
}

async fn add_genre(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<AddGenreRequest>,
) -> Result<(StatusCode, Json<AddGenreResponse>), ApiError> {
    let name = genre::add_genre(&state.app, &body.name)?;
    Ok((StatusCode::CREATED, Json(AddGenreResponse { name })))
}

async fn get_session(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<SessionState>, ApiError> {
    Ok(Json(brief::current_session(&state.app)?))
}

async fn generate_brief(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<BriefRequest>,
) -> Result<Json<GenreBrief>, ApiError> {
    Ok(Json(brief::generate_brief(&state.app, &body.genre).await?))
}

async fn regenerate_brief(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<GenreBrief>, ApiError> {
    Ok(Json(brief::regenerate_brief(&state.app).await?))
}

async fn get_brief_copy(State(state): State<Arc<ServerState>>) -> Result<String, ApiError> {
    Ok(brief::copy_brief(&state.app)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::requester::tests::{MockTransport, HOUSE};
    use crate::commands::AppState;
    use crate::config::AppConfig;
    use crate::server::router;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    fn app(transport: Arc<MockTransport>) -> Router {
        router(Arc::new(ServerState {
            token: TOKEN.to_string(),
            app: AppState::new(AppConfig::default(), transport),
        }))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_is_public() {
        let response = app(Arc::new(MockTransport::default()))
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["model"], "gemini-2.5-flash");
        assert_eq!(body["web_search"], true);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(Arc::new(MockTransport::default()))
            .oneshot(Request::builder().uri("/api/genres").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_genres_filter_and_add() {
        let app = app(Arc::new(MockTransport::default()));

        let response = app.clone().oneshot(get("/api/genres?q=house")).await.unwrap();
        assert_eq!(json_body(response).await, serde_json::json!(["House"]));

        let response = app
            .clone()
            .oneshot(post("/api/genres", r#"{"name": "tech house"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["name"], "Tech house");

        let response = app
            .oneshot(post("/api/genres", r#"{"name": "TECH HOUSE"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["kind"], "duplicate_genre");
    }

    #[tokio::test]
    async fn test_brief_success_and_copy() {
        let transport = Arc::new(MockTransport::always(HOUSE));
        let app = app(transport.clone());

        let response = app
            .clone()
            .oneshot(post("/api/brief", r#"{"genre": "House"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Mureka House Brief (Male Vocal)");
        assert_eq!(body["mood"].as_array().unwrap().len(), 3);

        let response = app.clone().oneshot(get("/api/brief/copy")).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(bytes.to_vec())
            .unwrap()
            .contains("Artists to reference: Frankie Knuckles, Daft Punk"));

        let response = app
            .oneshot(post("/api/brief/regenerate", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_brief_error_mapping() {
        let transport = Arc::new(MockTransport::default());
        transport.push(Ok("Sorry, I cannot help with that.".to_string()));
        let app = app(transport);

        let response = app
            .clone()
            .oneshot(post("/api/brief", r#"{"genre": "House"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "invalid_response_format");
        assert_eq!(
            body["error"],
            "The AI returned an invalid format. Please try regenerating."
        );

        // Queue is empty now, so the mock reports a service failure
        let response = app
            .clone()
            .oneshot(post("/api/brief/regenerate", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = app
            .clone()
            .oneshot(post("/api/brief", r#"{"genre": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get("/api/session")).await.unwrap();
        assert_eq!(json_body(response).await["state"], "failure");
    }
}
