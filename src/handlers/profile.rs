// src/handlers/profile.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::freelancer::{Freelancer, PublicProfile, UpdateProfileRequest},
};

// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Perfil",
    responses((status = 200, description = "Perfil do freelancer", body = Freelancer)),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Freelancer>, AppError> {
    Ok(Json(app_state.profile_service.get(auth.owner_id()).await?))
}

// PUT /api/profile
#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "Perfil",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Perfil atualizado", body = Freelancer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Endereço público já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Freelancer>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.profile_service.update(auth.owner_id(), payload).await?))
}

// GET /api/public/{slug}
#[utoipa::path(
    get,
    path = "/api/public/{slug}",
    tag = "Perfil",
    params(("slug" = String, Path, description = "Endereço público do freelancer")),
    responses(
        (status = 200, description = "Perfil publicado", body = PublicProfile),
        (status = 404, description = "Perfil não encontrado ou não publicado")
    )
)]
pub async fn public_profile(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicProfile>, AppError> {
    Ok(Json(app_state.profile_service.public_by_slug(&slug).await?))
}

// GET /api/public/{slug}/qrcode
#[utoipa::path(
    get,
    path = "/api/public/{slug}/qrcode",
    tag = "Perfil",
    params(("slug" = String, Path, description = "Endereço público do freelancer")),
    responses(
        (status = 200, description = "QR code PNG (image/png) apontando para o perfil"),
        (status = 404, description = "Perfil não encontrado ou não publicado")
    )
)]
pub async fn public_qr_code(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Só gera para perfis publicados
    app_state.profile_service.public_by_slug(&slug).await?;
    let png = app_state.profile_service.qr_code_png(&slug).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
