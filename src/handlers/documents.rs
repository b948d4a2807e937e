// src/handlers/documents.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::document::{DocumentFilter, DocumentSummary},
};

// GET /api/documents?kind=proposal|contract&status=...
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documentos",
    params(
        ("kind" = Option<String>, Query, description = "proposal ou contract"),
        ("status" = Option<String>, Query, description = "Status serializado (draft, sent, active...)")
    ),
    responses((status = 200, description = "Propostas e contratos, mais recentes primeiro", body = Vec<DocumentSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    Ok(Json(app_state.document_service.list(auth.owner_id(), &filter).await?))
}
