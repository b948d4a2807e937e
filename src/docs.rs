// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::confirm_email,
        handlers::auth::request_password_reset,
        handlers::auth::sign_out,
        handlers::auth::update_password,
        handlers::auth::me,

        // --- Assinatura ---
        handlers::auth::subscription,
        handlers::billing::checkout,
        handlers::billing::portal,

        // --- Perfil ---
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::profile::public_profile,
        handlers::profile::public_qr_code,

        // --- Propostas ---
        handlers::proposals::list_proposals,
        handlers::proposals::create_proposal,
        handlers::proposals::get_proposal,
        handlers::proposals::update_proposal,
        handlers::proposals::set_proposal_status,
        handlers::proposals::delete_proposal,
        handlers::proposals::generate_proposal,

        // --- Contratos ---
        handlers::contracts::list_contracts,
        handlers::contracts::create_contract,
        handlers::contracts::get_contract,
        handlers::contracts::update_contract,
        handlers::contracts::set_contract_status,
        handlers::contracts::delete_contract,
        handlers::contracts::contract_text,
        handlers::contracts::contract_ledger,
        handlers::contracts::generate_contract,

        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,

        // --- Financeiro ---
        handlers::finance::list_records,
        handlers::finance::create_record,
        handlers::finance::update_record,
        handlers::finance::delete_record,

        // --- Configurações, documentos, dashboard, conta ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::documents::list_documents,
        handlers::dashboard::get_dashboard_summary,
        handlers::account::delete_account,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::AccountResponse,
            models::auth::SignUpPayload,
            models::auth::SignInPayload,
            models::auth::PasswordResetPayload,
            models::auth::UpdatePasswordPayload,
            models::auth::AuthResponse,

            // --- Assinatura ---
            models::subscription::SubscriptionView,
            models::subscription::RedirectResponse,

            // --- Perfil ---
            models::freelancer::PlanType,
            models::freelancer::SubscriptionStatus,
            models::freelancer::Freelancer,
            models::freelancer::PublicProfile,
            models::freelancer::UpdateProfileRequest,

            // --- Status ---
            models::status::ProposalStatus,
            models::status::ContractStatus,

            // --- Propostas ---
            models::proposal::Proposal,
            models::proposal::ProposalPayload,
            models::proposal::ProposalStatusPayload,

            // --- Contratos ---
            models::contract::PersonType,
            models::contract::DeadlineMode,
            models::contract::DayCountKind,
            models::contract::PaymentType,
            models::contract::Installment,
            models::contract::Contract,
            models::contract::ContractPayload,
            models::contract::ContractStatusPayload,
            models::contract::ContractLedger,

            // --- Clientes ---
            models::client::Client,
            models::client::ClientPayload,

            // --- Financeiro ---
            models::finance::FinancialRecord,
            models::finance::FinancialRecordPayload,

            // --- Configurações ---
            models::settings::ValidityUnit,
            models::settings::UserSettings,
            models::settings::UpdateSettingsRequest,

            // --- Documentos ---
            models::document::DocumentKind,
            models::document::DocumentSummary,

            // --- Dashboard ---
            models::dashboard::ProposalPipeline,
            models::dashboard::ContractCounts,
            models::dashboard::DashboardSummary,

            // --- Conta ---
            handlers::account::AccountDeletedResponse,
        )
    ),
    tags(
        (name = "Autenticação", description = "Cadastro, login e senha"),
        (name = "Assinatura", description = "Período de teste, checkout e portal"),
        (name = "Perfil", description = "Perfil do freelancer e página pública"),
        (name = "Propostas", description = "Propostas comerciais"),
        (name = "Contratos", description = "Contratos de prestação de serviço"),
        (name = "Clientes", description = "Cadastro de clientes"),
        (name = "Financeiro", description = "Lançamentos financeiros"),
        (name = "Configurações", description = "Preferências dos documentos"),
        (name = "Documentos", description = "Lista unificada de propostas e contratos"),
        (name = "Dashboard", description = "Indicadores do freelancer"),
        (name = "Conta", description = "Exclusão da conta")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_protected_and_public_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/proposals/{id}/generate"));
        assert!(paths.contains_key("/api/public/{slug}/qrcode"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("api_jwt")));
    }
}
