// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Funil de propostas, contratos e faturamento", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard_summary(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = app_state.dashboard_service.get_summary(auth.owner_id()).await?;
    Ok(Json(summary))
}
