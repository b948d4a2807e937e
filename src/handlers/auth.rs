// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{
            AccountResponse, AuthResponse, ConfirmEmailQuery, PasswordResetPayload, SignInPayload, SignUpPayload,
            UpdatePasswordPayload,
        },
        subscription::SubscriptionView,
    },
};

// POST /api/auth/sign-up
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    tag = "Autenticação",
    request_body = SignUpPayload,
    responses(
        (status = 201, description = "Conta criada com período de teste", body = AccountResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn sign_up(
    State(app_state): State<AppState>,
    Json(payload): Json<SignUpPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let account = app_state.auth_service.sign_up(&payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

// POST /api/auth/sign-in
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    tag = "Autenticação",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Sessão iniciada", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn sign_in(
    State(app_state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;
    let session = app_state.auth_service.sign_in(&payload).await?;
    Ok(Json(session))
}

// GET /api/auth/confirm?token=...
#[utoipa::path(
    get,
    path = "/api/auth/confirm",
    tag = "Autenticação",
    params(("token" = String, Query, description = "Token enviado por e-mail")),
    responses(
        (status = 200, description = "E-mail confirmado", body = AccountResponse),
        (status = 401, description = "Token inválido ou expirado")
    )
)]
pub async fn confirm_email(
    State(app_state): State<AppState>,
    Query(query): Query<ConfirmEmailQuery>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = app_state.auth_service.confirm_email(&query.token).await?;
    Ok(Json(account))
}

// POST /api/auth/password-reset
#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    tag = "Autenticação",
    request_body = PasswordResetPayload,
    responses((status = 202, description = "Link enviado, se a conta existir"))
)]
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<PasswordResetPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    app_state.auth_service.request_password_reset(&payload.email).await?;
    Ok(StatusCode::ACCEPTED)
}

// POST /api/auth/sign-out
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    tag = "Autenticação",
    responses((status = 204, description = "Sessões encerradas")),
    security(("api_jwt" = []))
)]
pub async fn sign_out(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.sign_out(&auth.user).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/auth/password
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Autenticação",
    request_body = UpdatePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 400, description = "Senha inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    app_state.auth_service.update_password(&auth.user, &payload.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Autenticação",
    responses((status = 200, description = "Conta autenticada", body = AccountResponse)),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(app_state.auth_service.account_of(&auth.user).await?))
}

// GET /api/me/subscription
#[utoipa::path(
    get,
    path = "/api/me/subscription",
    tag = "Assinatura",
    responses((status = 200, description = "Situação do teste ou da assinatura", body = SubscriptionView)),
    security(("api_jwt" = []))
)]
pub async fn subscription(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SubscriptionView>, AppError> {
    Ok(Json(app_state.subscription_service.view(auth.owner_id()).await?))
}
