// src/services/proposal_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::non_empty},
    db::Repository,
    documents::preview::DocumentRef,
    models::{
        document::OutputFormat,
        proposal::{Proposal, ProposalPayload},
        status::ProposalStatus,
    },
    services::{
        client_service::{ClientContact, ClientService},
        document_service::{DocumentService, RenderedDocument},
        subscription::SubscriptionService,
    },
};

#[derive(Clone)]
pub struct ProposalService {
    repo: Repository<Proposal>,
    clients: ClientService,
    subscription: SubscriptionService,
    documents: DocumentService,
}

impl ProposalService {
    pub fn new(
        repo: Repository<Proposal>,
        clients: ClientService,
        subscription: SubscriptionService,
        documents: DocumentService,
    ) -> Self {
        Self { repo, clients, subscription, documents }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Proposal>, AppError> {
        self.repo.list_for_owner(owner_id).await
    }

    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Proposal, AppError> {
        self.repo.find(owner_id, id).await?.ok_or(AppError::NotFound("Proposta"))
    }

    async fn link_client(&self, owner_id: Uuid, proposal: &Proposal) -> Result<Uuid, AppError> {
        let client = self
            .clients
            .find_or_create(
                owner_id,
                ClientContact {
                    name: &proposal.client_name,
                    email: proposal.client_email.as_deref(),
                    phone: proposal.client_phone.as_deref(),
                    document: None,
                },
            )
            .await?;
        Ok(client.id)
    }

    /// Nome e serviço só com espaços contam como vazios.
    fn check_required(payload: &ProposalPayload) -> Result<(), AppError> {
        if payload.client_name.trim().is_empty() {
            return Err(AppError::invalid("clientName", "Informe o nome do cliente."));
        }
        if payload.service.trim().is_empty() {
            return Err(AppError::invalid("service", "Informe o serviço."));
        }
        Ok(())
    }

    fn apply(proposal: &mut Proposal, payload: ProposalPayload) {
        proposal.client_name = payload.client_name.trim().to_string();
        proposal.client_email = non_empty(&payload.client_email).map(str::to_string);
        proposal.client_phone = non_empty(&payload.client_phone).map(str::to_string);
        proposal.service = payload.service.trim().to_string();
        proposal.scope = non_empty(&payload.scope).map(str::to_string);
        proposal.value = payload.value;
        proposal.deadline = non_empty(&payload.deadline).map(str::to_string);
        proposal.payment_method = non_empty(&payload.payment_method).map(str::to_string);
        proposal.follow_up_date = payload.follow_up_date;
        proposal.follow_up_channel = non_empty(&payload.follow_up_channel).map(str::to_string);
        proposal.notes = non_empty(&payload.notes).map(str::to_string);
        if let Some(status) = payload.status {
            proposal.status = status;
        }
    }

    /// Salva como rascunho (ou no status informado). O payload já chega validado.
    pub async fn create(&self, owner_id: Uuid, payload: ProposalPayload) -> Result<Proposal, AppError> {
        Self::check_required(&payload)?;
        self.subscription.require_document_access(owner_id).await?;

        let now = Utc::now();
        let mut proposal = Proposal {
            id: Uuid::new_v4(),
            owner_id,
            client_id: None,
            client_name: String::new(),
            client_email: None,
            client_phone: None,
            service: String::new(),
            scope: None,
            value: Default::default(),
            deadline: None,
            payment_method: None,
            status: ProposalStatus::Draft,
            follow_up_date: None,
            follow_up_channel: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        Self::apply(&mut proposal, payload);
        proposal.client_id = Some(self.link_client(owner_id, &proposal).await?);

        let created = self.repo.create(&proposal).await?;
        tracing::info!(%owner_id, proposal_id = %created.id, "📝 Proposta criada");
        Ok(created)
    }

    pub async fn update(&self, owner_id: Uuid, id: Uuid, payload: ProposalPayload) -> Result<Proposal, AppError> {
        Self::check_required(&payload)?;
        self.subscription.require_document_access(owner_id).await?;

        let mut proposal = self.get(owner_id, id).await?;
        Self::apply(&mut proposal, payload);
        proposal.client_id = Some(self.link_client(owner_id, &proposal).await?);
        proposal.updated_at = Utc::now();
        self.repo.update(&proposal).await?.ok_or(AppError::NotFound("Proposta"))
    }

    /// Qualquer status pode ir para qualquer outro.
    pub async fn set_status(&self, owner_id: Uuid, id: Uuid, status: ProposalStatus) -> Result<Proposal, AppError> {
        let mut proposal = self.get(owner_id, id).await?;
        if proposal.status == status {
            return Ok(proposal);
        }
        proposal.status = status;
        proposal.updated_at = Utc::now();
        self.repo.update(&proposal).await?.ok_or(AppError::NotFound("Proposta"))
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(owner_id, id).await? {
            return Err(AppError::NotFound("Proposta"));
        }
        Ok(())
    }

    /// Gera o documento. Uma proposta em rascunho passa a "enviada"; nos
    /// demais status nada muda.
    pub async fn generate(
        &self,
        owner_id: Uuid,
        id: Uuid,
        format: OutputFormat,
    ) -> Result<(Proposal, RenderedDocument), AppError> {
        self.subscription.require_document_access(owner_id).await?;

        let mut proposal = self.get(owner_id, id).await?;
        let rendered = self
            .documents
            .render(owner_id, DocumentRef::Proposal(&proposal), format)
            .await?;

        let next = proposal.status.after_generate();
        if next != proposal.status {
            proposal.status = next;
            proposal.updated_at = Utc::now();
            proposal = self.repo.update(&proposal).await?.ok_or(AppError::NotFound("Proposta"))?;
            tracing::info!(proposal_id = %proposal.id, "📤 Proposta marcada como enviada");
        }

        Ok((proposal, rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestServices;
    use rust_decimal::Decimal;

    fn payload(name: &str, value: i64) -> ProposalPayload {
        ProposalPayload {
            client_name: name.into(),
            client_email: Some("maria@email.com".into()),
            client_phone: None,
            service: "Identidade visual".into(),
            scope: None,
            value: Decimal::from(value),
            deadline: None,
            payment_method: Some(" ".into()),
            status: None,
            follow_up_date: None,
            follow_up_channel: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn generate_promotes_draft_to_sent_once() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = Uuid::new_v4();

        let created = services.proposals.create(owner, payload("Maria", 2500)).await.unwrap();
        assert_eq!(created.status, ProposalStatus::Draft);
        assert_eq!(created.payment_method, None);

        let (first, html) = services.proposals.generate(owner, created.id, OutputFormat::Html).await.unwrap();
        assert_eq!(first.status, ProposalStatus::Sent);
        assert!(matches!(html, RenderedDocument::Html(_)));

        let (second, _) = services.proposals.generate(owner, created.id, OutputFormat::Html).await.unwrap();
        assert_eq!(second.status, ProposalStatus::Sent);
        assert_eq!(second.updated_at, first.updated_at);

        // Aceita continua aceita depois de gerar de novo
        services.proposals.set_status(owner, created.id, ProposalStatus::Accepted).await.unwrap();
        let (third, _) = services.proposals.generate(owner, created.id, OutputFormat::Html).await.unwrap();
        assert_eq!(third.status, ProposalStatus::Accepted);
    }

    #[tokio::test]
    async fn status_moves_freely_between_states() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = Uuid::new_v4();
        let created = services.proposals.create(owner, payload("Maria", 100)).await.unwrap();

        for status in [ProposalStatus::Expired, ProposalStatus::Draft, ProposalStatus::Closed, ProposalStatus::Sent] {
            let updated = services.proposals.set_status(owner, created.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn saving_links_a_client_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = Uuid::new_v4();

        let a = services.proposals.create(owner, payload("Maria", 100)).await.unwrap();
        let b = services.proposals.create(owner, payload("Maria", 200)).await.unwrap();
        assert!(a.client_id.is_some());
        assert_eq!(a.client_id, b.client_id);
        assert_eq!(services.clients.list(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn other_owners_cannot_see_or_delete() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let created = services.proposals.create(owner, payload("Maria", 100)).await.unwrap();

        assert!(matches!(services.proposals.get(stranger, created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(services.proposals.delete(stranger, created.id).await, Err(AppError::NotFound(_))));
        services.proposals.delete(owner, created.id).await.unwrap();
        assert!(services.proposals.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_or_service_is_rejected_before_saving() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = Uuid::new_v4();

        let err = services.proposals.create(owner, payload("   ", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField("clientName", _)));

        let blank_service = ProposalPayload { service: "  ".into(), ..payload("Maria", 100) };
        let err = services.proposals.create(owner, blank_service.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField("service", _)));

        assert!(services.proposals.list(owner).await.unwrap().is_empty());
        assert!(services.clients.list(owner).await.unwrap().is_empty());

        let created = services.proposals.create(owner, payload("Maria", 100)).await.unwrap();
        let err = services.proposals.update(owner, created.id, blank_service).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField("service", _)));
        assert_eq!(services.proposals.get(owner, created.id).await.unwrap().service, "Identidade visual");
    }

    #[tokio::test]
    async fn expired_trial_blocks_creation() {
        let dir = tempfile::tempdir().unwrap();
        let services = TestServices::new(dir.path());
        let owner = services.seed_expired_freelancer().await;

        let err = services.proposals.create(owner, payload("Maria", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::SubscriptionRequired));
    }
}
