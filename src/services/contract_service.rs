// src/services/contract_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        format::{non_empty, only_digits},
    },
    db::Repository,
    documents::{
        contract_text::{render_contract_text, ContractPolicy, ContractorParty},
        preview::DocumentRef,
    },
    models::{
        contract::{Contract, ContractPayload, DeadlineMode, PersonType},
        document::OutputFormat,
        proposal::Proposal,
        status::ContractStatus,
    },
    services::{
        client_service::{ClientContact, ClientService},
        document_service::{DocumentService, RenderedDocument},
        installments::derive_installments,
        profile_service::ProfileService,
        subscription::SubscriptionService,
    },
};

fn owned(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

/// Preenche o que veio vazio no payload com os dados da proposta.
fn seed_from_proposal(payload: &mut ContractPayload, proposal: &Proposal) {
    if payload.client_name.trim().is_empty() {
        payload.client_name = proposal.client_name.clone();
    }
    if non_empty(&payload.client_email).is_none() {
        payload.client_email = proposal.client_email.clone();
    }
    if non_empty(&payload.client_phone).is_none() {
        payload.client_phone = proposal.client_phone.clone();
    }
    if payload.service_name.trim().is_empty() {
        payload.service_name = proposal.service.clone();
    }
    if non_empty(&payload.service_scope).is_none() {
        payload.service_scope = proposal.scope.clone();
    }
    if payload.value.is_none() {
        payload.value = Some(proposal.value);
    }
}

/// Campos obrigatórios no salvamento.
fn check_required(contract: &Contract) -> Result<(), AppError> {
    if contract.client_name.trim().is_empty() {
        return Err(AppError::invalid("clientName", "Informe o nome do cliente."));
    }
    if contract.service_name.trim().is_empty() {
        return Err(AppError::invalid("serviceName", "Informe o serviço."));
    }
    if contract.value <= Decimal::ZERO {
        return Err(AppError::invalid("value", "O valor deve ser maior que zero."));
    }
    // O formato já foi validado no payload; aqui só o tipo de pessoa
    if let Some(document) = &contract.client_document {
        match (contract.person_type, only_digits(document).len()) {
            (PersonType::Individual, 14) => {
                return Err(AppError::invalid("clientDocument", "Pessoa física deve informar um CPF."));
            }
            (PersonType::Company, 11) => {
                return Err(AppError::invalid("clientDocument", "Pessoa jurídica deve informar um CNPJ."));
            }
            _ => {}
        }
    }
    Ok(())
}

fn apply(contract: &mut Contract, payload: ContractPayload) {
    contract.person_type = payload.person_type;
    contract.client_name = payload.client_name.trim().to_string();
    contract.client_document = owned(&payload.client_document);
    contract.client_rg = owned(&payload.client_rg);
    contract.client_company_name = owned(&payload.client_company_name);
    contract.client_address = owned(&payload.client_address);
    contract.client_city = owned(&payload.client_city);
    contract.client_state = owned(&payload.client_state).map(|s| s.to_uppercase());
    contract.client_phone = owned(&payload.client_phone);
    contract.client_email = owned(&payload.client_email);
    contract.service_name = payload.service_name.trim().to_string();
    contract.service_scope = owned(&payload.service_scope);
    contract.deliverables = owned(&payload.deliverables);
    if let Some(value) = payload.value {
        contract.value = value;
    }

    // Só um dos dois prazos vale, conforme o modo
    contract.deadline_mode = payload.deadline_mode;
    contract.deadline_day_kind = payload.deadline_day_kind;
    match payload.deadline_mode {
        DeadlineMode::Days => {
            contract.deadline_days = payload.deadline_days;
            contract.deadline_date = None;
        }
        DeadlineMode::Date => {
            contract.deadline_days = None;
            contract.deadline_date = payload.deadline_date;
        }
    }

    contract.payment_type = payload.payment_type;
    contract.installments = derive_installments(contract.value, payload.payment_type, &payload.installment_due_dates);
    contract.payment_notes = owned(&payload.payment_notes);
    if let Some(status) = payload.status {
        contract.status = status;
    }
}

#[derive(Clone)]
pub struct ContractService {
    repo: Repository<Contract>,
    proposals: Repository<Proposal>,
    clients: ClientService,
    profile: ProfileService,
    subscription: SubscriptionService,
    documents: DocumentService,
    policy: ContractPolicy,
}

impl ContractService {
    pub fn new(
        repo: Repository<Contract>,
        proposals: Repository<Proposal>,
        clients: ClientService,
        profile: ProfileService,
        subscription: SubscriptionService,
        documents: DocumentService,
        policy: ContractPolicy,
    ) -> Self {
        Self { repo, proposals, clients, profile, subscription, documents, policy }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Contract>, AppError> {
        self.repo.list_for_owner(owner_id).await
    }

    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Contract, AppError> {
        self.repo.find(owner_id, id).await?.ok_or(AppError::NotFound("Contrato"))
    }

    async fn render_text(&self, owner_id: Uuid, contract: &Contract, today: NaiveDate) -> Result<String, AppError> {
        let contractor = self
            .profile
            .find(owner_id)
            .await?
            .map(|f| ContractorParty::from(&f))
            .unwrap_or_default();
        Ok(render_contract_text(contract, &contractor, &self.policy, today))
    }

    async fn link_client(&self, owner_id: Uuid, contract: &Contract) -> Result<Uuid, AppError> {
        let client = self
            .clients
            .find_or_create(
                owner_id,
                ClientContact {
                    name: &contract.client_name,
                    email: contract.client_email.as_deref(),
                    phone: contract.client_phone.as_deref(),
                    document: contract.client_document.as_deref(),
                },
            )
            .await?;
        Ok(client.id)
    }

    /// Cria o contrato, opcionalmente a partir de uma proposta. As parcelas
    /// e o texto são recalculados a cada salvamento.
    pub async fn create(&self, owner_id: Uuid, mut payload: ContractPayload) -> Result<Contract, AppError> {
        self.subscription.require_document_access(owner_id).await?;

        let mut proposal_id = None;
        if let Some(id) = payload.from_proposal_id {
            let proposal = self.proposals.find(owner_id, id).await?.ok_or(AppError::NotFound("Proposta"))?;
            seed_from_proposal(&mut payload, &proposal);
            proposal_id = Some(proposal.id);
        }

        let now = Utc::now();
        let mut contract = Contract {
            id: Uuid::new_v4(),
            owner_id,
            proposal_id,
            client_id: None,
            person_type: Default::default(),
            client_name: String::new(),
            client_document: None,
            client_rg: None,
            client_company_name: None,
            client_address: None,
            client_city: None,
            client_state: None,
            client_phone: None,
            client_email: None,
            service_name: String::new(),
            service_scope: None,
            deliverables: None,
            value: Decimal::ZERO,
            deadline_mode: Default::default(),
            deadline_days: None,
            deadline_day_kind: Default::default(),
            deadline_date: None,
            payment_type: Default::default(),
            installments: Vec::new(),
            payment_notes: None,
            status: ContractStatus::Draft,
            contract_text: String::new(),
            created_at: now,
            updated_at: now,
        };
        apply(&mut contract, payload);
        check_required(&contract)?;

        contract.client_id = Some(self.link_client(owner_id, &contract).await?);
        contract.contract_text = self.render_text(owner_id, &contract, now.date_naive()).await?;

        let created = self.repo.create(&contract).await?;
        tracing::info!(%owner_id, contract_id = %created.id, "📑 Contrato criado");
        Ok(created)
    }

    pub async fn update(&self, owner_id: Uuid, id: Uuid, payload: ContractPayload) -> Result<Contract, AppError> {
        self.subscription.require_document_access(owner_id).await?;

        let mut contract = self.get(owner_id, id).await?;
        apply(&mut contract, payload);
        check_required(&contract)?;

        let now = Utc::now();
        contract.client_id = Some(self.link_client(owner_id, &contract).await?);
        contract.contract_text = self.render_text(owner_id, &contract, now.date_naive()).await?;
        contract.updated_at = now;
        self.repo.update(&contract).await?.ok_or(AppError::NotFound("Contrato"))
    }

    pub async fn set_status(&self, owner_id: Uuid, id: Uuid, status: ContractStatus) -> Result<Contract, AppError> {
        let mut contract = self.get(owner_id, id).await?;
        if contract.status == status {
            return Ok(contract);
        }
        contract.status = status;
        contract.updated_at = Utc::now();
        self.repo.update(&contract).await?.ok_or(AppError::NotFound("Contrato"))
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(owner_id, id).await? {
            return Err(AppError::NotFound("Contrato"));
        }
        Ok(())
    }

    /// Texto salvo no último salvamento.
    pub async fn text(&self, owner_id: Uuid, id: Uuid) -> Result<String, AppError> {
        Ok(self.get(owner_id, id).await?.contract_text)
    }

    /// Renderiza de novo o texto (data de hoje) e gera o documento. O texto
    /// novo só é salvo se a geração der certo.
    pub async fn generate(
        &self,
        owner_id: Uuid,
        id: Uuid,
        format: OutputFormat,
    ) -> Result<(Contract, RenderedDocument), AppError> {
        self.subscription.require_document_access(owner_id).await?;

        let mut contract = self.get(owner_id, id).await?;
        let text = self.render_text(owner_id, &contract, Utc::now().date_naive()).await?;
        let text_changed = text != contract.contract_text;
        contract.contract_text = text;

        let rendered = self
            .documents
            .render(owner_id, DocumentRef::Contract(&contract), format)
            .await?;

        if text_changed {
            contract.updated_at = Utc::now();
            contract = self.repo.update(&contract).await?.ok_or(AppError::NotFound("Contrato"))?;
        }
        Ok((contract, rendered))
    }
}
