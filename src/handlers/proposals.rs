// src/handlers/proposals.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        document::GenerateQuery,
        proposal::{Proposal, ProposalPayload, ProposalStatusPayload},
    },
};

// GET /api/proposals
#[utoipa::path(
    get,
    path = "/api/proposals",
    tag = "Propostas",
    responses((status = 200, description = "Propostas do freelancer", body = Vec<Proposal>)),
    security(("api_jwt" = []))
)]
pub async fn list_proposals(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Proposal>>, AppError> {
    Ok(Json(app_state.proposal_service.list(auth.owner_id()).await?))
}

// POST /api/proposals
#[utoipa::path(
    post,
    path = "/api/proposals",
    tag = "Propostas",
    request_body = ProposalPayload,
    responses(
        (status = 201, description = "Proposta salva", body = Proposal),
        (status = 400, description = "Dados inválidos"),
        (status = 402, description = "Período de teste encerrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_proposal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<ProposalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let proposal = app_state.proposal_service.create(auth.owner_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

// GET /api/proposals/{id}
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    tag = "Propostas",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 200, description = "Proposta", body = Proposal),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_proposal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(app_state.proposal_service.get(auth.owner_id(), id).await?))
}

// PUT /api/proposals/{id}
#[utoipa::path(
    put,
    path = "/api/proposals/{id}",
    tag = "Propostas",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    request_body = ProposalPayload,
    responses(
        (status = 200, description = "Proposta atualizada", body = Proposal),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_proposal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProposalPayload>,
) -> Result<Json<Proposal>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.proposal_service.update(auth.owner_id(), id, payload).await?))
}

// PUT /api/proposals/{id}/status
#[utoipa::path(
    put,
    path = "/api/proposals/{id}/status",
    tag = "Propostas",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    request_body = ProposalStatusPayload,
    responses((status = 200, description = "Status alterado", body = Proposal)),
    security(("api_jwt" = []))
)]
pub async fn set_proposal_status(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProposalStatusPayload>,
) -> Result<Json<Proposal>, AppError> {
    let proposal = app_state
        .proposal_service
        .set_status(auth.owner_id(), id, payload.status)
        .await?;
    Ok(Json(proposal))
}

// DELETE /api/proposals/{id}
#[utoipa::path(
    delete,
    path = "/api/proposals/{id}",
    tag = "Propostas",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 204, description = "Proposta excluída"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_proposal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.proposal_service.delete(auth.owner_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/proposals/{id}/generate?format=html|pdf
#[utoipa::path(
    post,
    path = "/api/proposals/{id}/generate",
    tag = "Propostas",
    params(
        ("id" = Uuid, Path, description = "ID da proposta"),
        ("format" = Option<String>, Query, description = "html (padrão) ou pdf")
    ),
    responses(
        (status = 200, description = "Documento gerado (HTML ou PDF)"),
        (status = 402, description = "Período de teste encerrado"),
        (status = 502, description = "Falha na exportação do PDF")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_proposal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (_, rendered) = app_state
        .proposal_service
        .generate(auth.owner_id(), id, query.format)
        .await?;
    let content_type = rendered.content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], rendered.into_bytes()))
}
