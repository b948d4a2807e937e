pub mod account_service;
pub mod auth;
pub mod billing_service;
pub mod client_service;
pub mod contract_service;
pub mod dashboard_service;
pub mod document_service;
pub mod finance_service;
pub mod installments;
pub mod profile_service;
pub mod proposal_service;
pub mod settings_service;
pub mod subscription;

#[cfg(test)]
pub(crate) mod testing {
    use std::{path::Path, sync::Arc};

    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::{
        db::{LocalRecordStore, Repository, SharedStore},
        documents::{contract_text::ContractPolicy, pdf::GenPdfExporter},
        models::{
            contract::{Contract, PaymentType},
            freelancer::{Freelancer, PlanType, SubscriptionStatus},
            proposal::Proposal,
            status::{ContractStatus, ProposalStatus},
        },
        services::{
            client_service::ClientService, contract_service::ContractService, document_service::DocumentService,
            installments::derive_installments, profile_service::ProfileService, proposal_service::ProposalService,
            settings_service::SettingsService, subscription::SubscriptionService,
        },
    };

    pub fn local_store(dir: &Path) -> SharedStore {
        Arc::new(LocalRecordStore::open(dir).unwrap())
    }

    pub fn sample_proposal(owner_id: Uuid) -> Proposal {
        let now = Utc::now();
        Proposal {
            id: Uuid::new_v4(),
            owner_id,
            client_id: None,
            client_name: "Maria da Silva".into(),
            client_email: None,
            client_phone: None,
            service: "Identidade visual".into(),
            scope: None,
            value: Decimal::from(2500),
            deadline: None,
            payment_method: None,
            status: ProposalStatus::Draft,
            follow_up_date: None,
            follow_up_channel: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sample_contract(owner_id: Uuid) -> Contract {
        let now = Utc::now();
        let value = Decimal::from(1000);
        Contract {
            id: Uuid::new_v4(),
            owner_id,
            proposal_id: None,
            client_id: None,
            person_type: Default::default(),
            client_name: "Maria da Silva".into(),
            client_document: None,
            client_rg: None,
            client_company_name: None,
            client_address: None,
            client_city: None,
            client_state: None,
            client_phone: None,
            client_email: None,
            service_name: "Site institucional".into(),
            service_scope: None,
            deliverables: None,
            value,
            deadline_mode: Default::default(),
            deadline_days: Some(30),
            deadline_day_kind: Default::default(),
            deadline_date: None,
            payment_type: PaymentType::AVista,
            installments: derive_installments(value, PaymentType::AVista, &[]),
            payment_notes: None,
            status: ContractStatus::Draft,
            contract_text: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Serviços ligados ao armazenamento local, sem PDF de verdade.
    pub struct TestServices {
        pub store: SharedStore,
        pub clients: ClientService,
        pub proposals: ProposalService,
        pub contracts: ContractService,
    }

    impl TestServices {
        pub fn new(dir: &Path) -> Self {
            let store = local_store(dir);
            let clients = ClientService::new(Repository::new(store.clone()));
            let profile = ProfileService::new(Repository::new(store.clone()), "http://localhost:3000".into());
            let settings = SettingsService::new(Repository::new(store.clone()));
            let subscription = SubscriptionService::new(Repository::new(store.clone()), 7);
            let documents = DocumentService::new(
                Repository::new(store.clone()),
                Repository::new(store.clone()),
                profile.clone(),
                settings,
                Arc::new(GenPdfExporter::new(dir.join("fonts"), "Roboto", dir)),
            );
            let proposals = ProposalService::new(
                Repository::new(store.clone()),
                clients.clone(),
                subscription.clone(),
                documents.clone(),
            );
            let contracts = ContractService::new(
                Repository::new(store.clone()),
                Repository::new(store.clone()),
                clients.clone(),
                profile,
                subscription,
                documents,
                ContractPolicy::default(),
            );
            Self { store, clients, proposals, contracts }
        }

        /// Freelancer no plano gratuito com o teste vencido há um dia.
        pub async fn seed_expired_freelancer(&self) -> Uuid {
            let id = Uuid::new_v4();
            let started = Utc::now() - Duration::days(8);
            Repository::<Freelancer>::new(self.store.clone())
                .create(&Freelancer {
                    id,
                    owner_id: id,
                    name: "João".into(),
                    email: "joao@email.com".into(),
                    document: None,
                    phone: None,
                    address: None,
                    city: None,
                    state: None,
                    plan_type: PlanType::Free,
                    subscription_status: SubscriptionStatus::Trial,
                    trial_started_at: Some(started),
                    trial_ends_at: Some(started + Duration::days(7)),
                    marketing_opt_in: false,
                    slug: None,
                    specialty: None,
                    bio: None,
                    photo_url: None,
                    whatsapp_link: None,
                    video_url: None,
                    portfolio_urls: vec![],
                    published: false,
                    created_at: started,
                    updated_at: started,
                })
                .await
                .unwrap();
            id
        }
    }
}
