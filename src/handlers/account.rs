// src/handlers/account.rs

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeletedResponse {
    pub removed_records: u64,
}

// DELETE /api/account
#[utoipa::path(
    delete,
    path = "/api/account",
    tag = "Conta",
    responses((status = 200, description = "Conta e todos os dados removidos", body = AccountDeletedResponse)),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<AccountDeletedResponse>, AppError> {
    let report = app_state.account_service.delete_account(auth.owner_id()).await?;
    Ok(Json(AccountDeletedResponse { removed_records: report.total() }))
}
