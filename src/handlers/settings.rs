// src/handlers/settings.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::settings::{UpdateSettingsRequest, UserSettings},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Configurações",
    responses((status = 200, description = "Configurações (criadas com os padrões na primeira leitura)", body = UserSettings)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(app_state.settings_service.get_or_create(auth.owner_id()).await?))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Configurações",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Configurações atualizadas", body = UserSettings),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<UserSettings>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.settings_service.update(auth.owner_id(), payload).await?))
}
