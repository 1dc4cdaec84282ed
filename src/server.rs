//! HTTP server for norns context compilation

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{ClassificationError, ConflictingDocument, PipelineError, ResolutionError};
use crate::{ClarificationRequest, CompileRequest, CompileResponse, ContextEngine, Document, ExplicitFlags};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ContextEngine>,
    pub default_budget: usize,
}

/// HTTP request body; budget falls back to the configured default
#[derive(Debug, Deserialize)]
pub struct CompileRequestHttp {
    pub input: String,
    #[serde(default)]
    pub flags: ExplicitFlags,
    pub budget: Option<usize>,
    pub explain: Option<bool>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification: Option<ClarificationRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conflicting: Vec<ConflictingDocument>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub documents: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Compile handler
async fn compile_handler(
    State(state): State<AppState>,
    Json(req): Json<CompileRequestHttp>,
) -> Result<Json<CompileResponse>, ApiError> {
    let budget = req.budget.unwrap_or(state.default_budget);
    info!("Received compile request: budget={}, flags={:?}", budget, req.flags);

    let compile_req = CompileRequest {
        input: req.input,
        flags: req.flags,
        budget,
        explain: req.explain.unwrap_or(false),
    };

    state
        .engine
        .compile(compile_req)
        .map(Json)
        .map_err(error_response)
}

fn error_response(err: PipelineError) -> ApiError {
    let details = Some(err.to_string());
    match err {
        PipelineError::Classification(ClassificationError::NeedsClarification(request)) => {
            info!("Clarification needed: {}", request.reason);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: "needs_clarification".to_string(),
                    details,
                    clarification: Some(request),
                    conflicting: vec![],
                }),
            )
        }
        PipelineError::Resolution(ResolutionError::Conflict(a, b)) => {
            warn!("Conflicting documents selected: {} / {}", a.id, b.id);
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "conflict".to_string(),
                    details,
                    clarification: None,
                    conflicting: vec![a, b],
                }),
            )
        }
        PipelineError::Assembly(e) => {
            error!("Assembly failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "assembly_failed".to_string(),
                    details,
                    clarification: None,
                    conflicting: vec![],
                }),
            )
        }
    }
}

/// Registry listing (metadata only)
async fn documents_handler(State(state): State<AppState>) -> Json<Vec<Document>> {
    Json(state.engine.registry().documents().to_vec())
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "norns-context".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: state.engine.registry().len(),
    })
}

/// Create and configure the HTTP router
pub fn create_router(engine: Arc<ContextEngine>, default_budget: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/documents", get(documents_handler))
        .route("/compile", post(compile_handler))
        .with_state(AppState {
            engine,
            default_budget,
        })
}

/// Serve on an already-bound listener
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> anyhow::Result<()> {
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the HTTP server
pub async fn run_server(engine: Arc<ContextEngine>, addr: &str, default_budget: usize) -> anyhow::Result<()> {
    info!("Starting norns-context server on {}", addr);

    let app = create_router(engine, default_budget);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, app).await
}
