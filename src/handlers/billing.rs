// src/handlers/billing.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::subscription::RedirectResponse,
};

// POST /api/billing/checkout
#[utoipa::path(
    post,
    path = "/api/billing/checkout",
    tag = "Assinatura",
    responses(
        (status = 200, description = "URL do checkout", body = RedirectResponse),
        (status = 502, description = "Função de cobrança indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<RedirectResponse>, AppError> {
    let redirect = app_state.billing_service.create_checkout_session(&auth.token).await?;
    tracing::info!(owner_id = %auth.owner_id(), "💳 Checkout iniciado");
    Ok(Json(redirect))
}

// POST /api/billing/portal
#[utoipa::path(
    post,
    path = "/api/billing/portal",
    tag = "Assinatura",
    responses(
        (status = 200, description = "URL do portal de assinatura", body = RedirectResponse),
        (status = 502, description = "Função de cobrança indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn portal(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<RedirectResponse>, AppError> {
    Ok(Json(app_state.billing_service.create_portal_session(&auth.token).await?))
}
