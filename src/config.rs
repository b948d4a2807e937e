// src/config.rs

use std::{env, fmt::Display, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;
use rust_decimal::Decimal;

use crate::{
    db::{Repository, SharedStore},
    documents::{contract_text::ContractPolicy, pdf::GenPdfExporter},
    services::{
        account_service::AccountService,
        auth::{AuthService, LoggingNotifier},
        billing_service::BillingService,
        client_service::ClientService,
        contract_service::ContractService,
        dashboard_service::DashboardService,
        document_service::DocumentService,
        finance_service::FinanceService,
        profile_service::ProfileService,
        proposal_service::ProposalService,
        settings_service::SettingsService,
        subscription::{SubscriptionService, DEFAULT_TRIAL_DAYS},
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub local_store_dir: PathBuf,
    pub pdf_fonts_dir: PathBuf,
    pub pdf_font_family: String,
    pub pdf_staging_dir: PathBuf,
    pub billing_function_url: Option<String>,
    pub public_base_url: String,
    pub bind_addr: String,
    pub trial_days: i64,
    pub require_email_confirmation: bool,
    pub contract_policy: ContractPolicy,
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválido ({:?}): {}", key, raw, e)),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = optional(&lookup, "JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let defaults = ContractPolicy::default();
        let contract_policy = ContractPolicy {
            revision_rounds: parsed(&lookup, "CONTRACT_REVISION_ROUNDS", defaults.revision_rounds)?,
            revision_window_business_days: parsed(
                &lookup,
                "CONTRACT_REVISION_WINDOW_DAYS",
                defaults.revision_window_business_days,
            )?,
            support_days: parsed(&lookup, "CONTRACT_SUPPORT_DAYS", defaults.support_days)?,
            late_fee_percent: parsed::<Decimal>(&lookup, "CONTRACT_LATE_FEE_PERCENT", defaults.late_fee_percent)?,
            monthly_interest_percent: parsed::<Decimal>(
                &lookup,
                "CONTRACT_MONTHLY_INTEREST_PERCENT",
                defaults.monthly_interest_percent,
            )?,
            suspension_after_days: parsed(&lookup, "CONTRACT_SUSPENSION_DAYS", defaults.suspension_after_days)?,
            termination_notice_days: parsed(
                &lookup,
                "CONTRACT_TERMINATION_NOTICE_DAYS",
                defaults.termination_notice_days,
            )?,
            confidentiality_years: parsed(&lookup, "CONTRACT_CONFIDENTIALITY_YEARS", defaults.confidentiality_years)?,
        };

        let trial_days: i64 = parsed(&lookup, "TRIAL_DAYS", DEFAULT_TRIAL_DAYS)?;
        if trial_days < 1 {
            anyhow::bail!("TRIAL_DAYS deve ser pelo menos 1");
        }

        Ok(Self {
            database_url: optional(&lookup, "DATABASE_URL"),
            jwt_secret,
            local_store_dir: optional(&lookup, "LOCAL_STORE_DIR").unwrap_or_else(|| "./data".into()).into(),
            pdf_fonts_dir: optional(&lookup, "PDF_FONTS_DIR").unwrap_or_else(|| "./fonts".into()).into(),
            pdf_font_family: optional(&lookup, "PDF_FONT_FAMILY").unwrap_or_else(|| "Roboto".into()),
            pdf_staging_dir: optional(&lookup, "PDF_STAGING_DIR").map(PathBuf::from).unwrap_or_else(env::temp_dir),
            billing_function_url: optional(&lookup, "BILLING_FUNCTION_URL"),
            public_base_url: optional(&lookup, "PUBLIC_BASE_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            bind_addr: optional(&lookup, "BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            trial_days,
            require_email_confirmation: parsed(&lookup, "REQUIRE_EMAIL_CONFIRMATION", false)?,
            contract_policy,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
    pub auth_service: AuthService,
    pub subscription_service: SubscriptionService,
    pub billing_service: BillingService,
    pub profile_service: ProfileService,
    pub settings_service: SettingsService,
    pub client_service: ClientService,
    pub proposal_service: ProposalService,
    pub contract_service: ContractService,
    pub finance_service: FinanceService,
    pub document_service: DocumentService,
    pub dashboard_service: DashboardService,
    pub account_service: AccountService,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> anyhow::Result<Self> {
        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(
            Repository::new(store.clone()),
            Repository::new(store.clone()),
            Arc::new(LoggingNotifier),
            config.jwt_secret.clone(),
            config.public_base_url.clone(),
            config.trial_days,
            config.require_email_confirmation,
        );
        let subscription_service = SubscriptionService::new(Repository::new(store.clone()), config.trial_days);
        let billing_service = BillingService::new(config.billing_function_url.clone())?;
        let profile_service = ProfileService::new(Repository::new(store.clone()), config.public_base_url.clone());
        let settings_service = SettingsService::new(Repository::new(store.clone()));
        let client_service = ClientService::new(Repository::new(store.clone()));

        let exporter = GenPdfExporter::new(
            config.pdf_fonts_dir.clone(),
            config.pdf_font_family.clone(),
            config.pdf_staging_dir.clone(),
        );
        let document_service = DocumentService::new(
            Repository::new(store.clone()),
            Repository::new(store.clone()),
            profile_service.clone(),
            settings_service.clone(),
            Arc::new(exporter),
        );

        let proposal_service = ProposalService::new(
            Repository::new(store.clone()),
            client_service.clone(),
            subscription_service.clone(),
            document_service.clone(),
        );
        let contract_service = ContractService::new(
            Repository::new(store.clone()),
            Repository::new(store.clone()),
            client_service.clone(),
            profile_service.clone(),
            subscription_service.clone(),
            document_service.clone(),
            config.contract_policy,
        );
        let finance_service = FinanceService::new(Repository::new(store.clone()), Repository::new(store.clone()));
        let dashboard_service = DashboardService::new(
            Repository::new(store.clone()),
            Repository::new(store.clone()),
            Repository::new(store.clone()),
        );
        let account_service = AccountService::new(store.clone());

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            subscription_service,
            billing_service,
            profile_service,
            settings_service,
            client_service,
            proposal_service,
            contract_service,
            finance_service,
            document_service,
            dashboard_service,
            account_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "segredo")])).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.local_store_dir, PathBuf::from("./data"));
        assert_eq!(config.pdf_font_family, "Roboto");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.trial_days, 7);
        assert!(!config.require_email_confirmation);
        assert_eq!(config.contract_policy, ContractPolicy::default());
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn overrides_and_invalid_numbers() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "segredo"),
            ("DATABASE_URL", "postgres://localhost/propostas"),
            ("CONTRACT_REVISION_ROUNDS", "3"),
            ("CONTRACT_LATE_FEE_PERCENT", "2.5"),
            ("REQUIRE_EMAIL_CONFIRMATION", "true"),
        ]))
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/propostas"));
        assert_eq!(config.contract_policy.revision_rounds, 3);
        assert_eq!(config.contract_policy.late_fee_percent, "2.5".parse::<Decimal>().unwrap());
        assert!(config.require_email_confirmation);

        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("TRIAL_DAYS", "sete")])).unwrap_err();
        assert!(err.to_string().contains("TRIAL_DAYS"));
    }
}
