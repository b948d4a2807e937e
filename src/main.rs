//src/main.rs

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod documents;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
    middleware::auth::auth_guard,
};

async fn health(State(app_state): State<AppState>) -> String {
    format!("OK ({})", app_state.store.backend_name())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let store = db::connect_store(&config).await?;
    let app_state = AppState::new(config, store)?;

    // Rotas de autenticação públicas
    let auth_routes = Router::new()
        .route("/sign-up", post(handlers::auth::sign_up))
        .route("/sign-in", post(handlers::auth::sign_in))
        .route("/confirm", get(handlers::auth::confirm_email))
        .route("/password-reset", post(handlers::auth::request_password_reset));

    let public_routes = Router::new()
        .route("/{slug}", get(handlers::profile::public_profile))
        .route("/{slug}/qrcode", get(handlers::profile::public_qr_code));

    // Tudo abaixo exige o token de sessão
    let session_routes = Router::new()
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route("/auth/password", put(handlers::auth::update_password))
        .route("/me", get(handlers::auth::me))
        .route("/me/subscription", get(handlers::auth::subscription))
        .route("/billing/checkout", post(handlers::billing::checkout))
        .route("/billing/portal", post(handlers::billing::portal))
        .route(
            "/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/documents", get(handlers::documents::list_documents))
        .route("/dashboard", get(handlers::dashboard::get_dashboard_summary))
        .route("/account", delete(handlers::account::delete_account));

    let proposal_routes = Router::new()
        .route(
            "/",
            get(handlers::proposals::list_proposals).post(handlers::proposals::create_proposal),
        )
        .route(
            "/{id}",
            get(handlers::proposals::get_proposal)
                .put(handlers::proposals::update_proposal)
                .delete(handlers::proposals::delete_proposal),
        )
        .route("/{id}/status", put(handlers::proposals::set_proposal_status))
        .route("/{id}/generate", post(handlers::proposals::generate_proposal));

    let contract_routes = Router::new()
        .route(
            "/",
            get(handlers::contracts::list_contracts).post(handlers::contracts::create_contract),
        )
        .route(
            "/{id}",
            get(handlers::contracts::get_contract)
                .put(handlers::contracts::update_contract)
                .delete(handlers::contracts::delete_contract),
        )
        .route("/{id}/status", put(handlers::contracts::set_contract_status))
        .route("/{id}/generate", post(handlers::contracts::generate_contract))
        .route("/{id}/text", get(handlers::contracts::contract_text))
        .route("/{id}/ledger", get(handlers::contracts::contract_ledger));

    let client_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route("/{id}", put(handlers::clients::update_client));

    let finance_routes = Router::new()
        .route(
            "/records",
            get(handlers::finance::list_records).post(handlers::finance::create_record),
        )
        .route(
            "/records/{id}",
            put(handlers::finance::update_record).delete(handlers::finance::delete_record),
        );

    let protected_routes = session_routes
        .nest("/proposals", proposal_routes)
        .nest("/contracts", contract_routes)
        .nest("/clients", client_routes)
        .nest("/finance", finance_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api", protected_routes)
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
