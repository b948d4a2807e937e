// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::finance::{FinancialRecord, FinancialRecordFilter, FinancialRecordPayload},
};

// GET /api/finance/records?contractId=...
#[utoipa::path(
    get,
    path = "/api/finance/records",
    tag = "Financeiro",
    params(("contractId" = Option<Uuid>, Query, description = "Filtra pelos lançamentos de um contrato")),
    responses((status = 200, description = "Lançamentos financeiros", body = Vec<FinancialRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(filter): Query<FinancialRecordFilter>,
) -> Result<Json<Vec<FinancialRecord>>, AppError> {
    Ok(Json(app_state.finance_service.list(auth.owner_id(), &filter).await?))
}

// POST /api/finance/records
#[utoipa::path(
    post,
    path = "/api/finance/records",
    tag = "Financeiro",
    request_body = FinancialRecordPayload,
    responses(
        (status = 201, description = "Lançamento criado", body = FinancialRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<FinancialRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let record = app_state.finance_service.create(auth.owner_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/finance/records/{id}
#[utoipa::path(
    put,
    path = "/api/finance/records/{id}",
    tag = "Financeiro",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    request_body = FinancialRecordPayload,
    responses(
        (status = 200, description = "Lançamento atualizado", body = FinancialRecord),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinancialRecordPayload>,
) -> Result<Json<FinancialRecord>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.finance_service.update(auth.owner_id(), id, payload).await?))
}

// DELETE /api/finance/records/{id}
#[utoipa::path(
    delete,
    path = "/api/finance/records/{id}",
    tag = "Financeiro",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 204, description = "Lançamento excluído"),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_record(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete(auth.owner_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
