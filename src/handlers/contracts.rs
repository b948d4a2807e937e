// src/handlers/contracts.rs

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
        contract::{Contract, ContractLedger, ContractPayload, ContractStatusPayload},
        document::GenerateQuery,
    },
};

// GET /api/contracts
#[utoipa::path(
    get,
    path = "/api/contracts",
    tag = "Contratos",
    responses((status = 200, description = "Contratos do freelancer", body = Vec<Contract>)),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Contract>>, AppError> {
    Ok(Json(app_state.contract_service.list(auth.owner_id()).await?))
}

// POST /api/contracts
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = "Contratos",
    request_body = ContractPayload,
    responses(
        (status = 201, description = "Contrato salvo com texto e parcelas", body = Contract),
        (status = 400, description = "Dados inválidos"),
        (status = 402, description = "Período de teste encerrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<ContractPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contract = app_state.contract_service.create(auth.owner_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

// GET /api/contracts/{id}
#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato", body = Contract),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contract(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, AppError> {
    Ok(Json(app_state.contract_service.get(auth.owner_id(), id).await?))
}

// PUT /api/contracts/{id}
#[utoipa::path(
    put,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    request_body = ContractPayload,
    responses(
        (status = 200, description = "Contrato atualizado", body = Contract),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contract(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContractPayload>,
) -> Result<Json<Contract>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.contract_service.update(auth.owner_id(), id, payload).await?))
}

// PUT /api/contracts/{id}/status
#[utoipa::path(
    put,
    path = "/api/contracts/{id}/status",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    request_body = ContractStatusPayload,
    responses((status = 200, description = "Status alterado", body = Contract)),
    security(("api_jwt" = []))
)]
pub async fn set_contract_status(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContractStatusPayload>,
) -> Result<Json<Contract>, AppError> {
    let contract = app_state
        .contract_service
        .set_status(auth.owner_id(), id, payload.status)
        .await?;
    Ok(Json(contract))
}

// DELETE /api/contracts/{id}
#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 204, description = "Contrato excluído"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.contract_service.delete(auth.owner_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/contracts/{id}/text
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/text",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses((status = 200, description = "Texto do contrato (text/plain)")),
    security(("api_jwt" = []))
)]
pub async fn contract_text(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let text = app_state.contract_service.text(auth.owner_id(), id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

// GET /api/contracts/{id}/ledger
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/ledger",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Recebido e em aberto do contrato", body = ContractLedger),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn contract_ledger(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractLedger>, AppError> {
    Ok(Json(app_state.finance_service.ledger(auth.owner_id(), id).await?))
}

// POST /api/contracts/{id}/generate?format=html|pdf
#[utoipa::path(
    post,
    path = "/api/contracts/{id}/generate",
    tag = "Contratos",
    params(
        ("id" = Uuid, Path, description = "ID do contrato"),
        ("format" = Option<String>, Query, description = "html (padrão) ou pdf")
    ),
    responses(
        (status = 200, description = "Documento gerado (HTML ou PDF)"),
        (status = 402, description = "Período de teste encerrado"),
        (status = 502, description = "Falha na exportação do PDF")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_contract(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (_, rendered) = app_state
        .contract_service
        .generate(auth.owner_id(), id, query.format)
        .await?;
    let content_type = rendered.content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], rendered.into_bytes()))
}
