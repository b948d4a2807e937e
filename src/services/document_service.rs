// src/services/document_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Repository,
    documents::{
        pdf::PdfExporter,
        preview::{printable, render_preview_html, DocumentRef, PreviewContext},
    },
    models::{
        contract::Contract,
        document::{DocumentFilter, DocumentKind, DocumentSummary, OutputFormat},
        proposal::Proposal,
    },
    services::{profile_service::ProfileService, settings_service::SettingsService},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedDocument {
    Html(String),
    Pdf(Vec<u8>),
}

impl RenderedDocument {
    pub fn content_type(&self) -> &'static str {
        match self {
            RenderedDocument::Html(_) => "text/html; charset=utf-8",
            RenderedDocument::Pdf(_) => "application/pdf",
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RenderedDocument::Html(html) => html.into_bytes(),
            RenderedDocument::Pdf(bytes) => bytes,
        }
    }
}

fn proposal_summary(p: Proposal) -> DocumentSummary {
    DocumentSummary {
        id: p.id,
        kind: DocumentKind::Proposal,
        client_name: p.client_name,
        title: p.service,
        value: p.value,
        status: p.status.as_str().to_string(),
        status_label: p.status.label().to_string(),
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

fn contract_summary(c: Contract) -> DocumentSummary {
    DocumentSummary {
        id: c.id,
        kind: DocumentKind::Contract,
        client_name: c.client_name,
        title: c.service_name,
        value: c.value,
        status: c.status.as_str().to_string(),
        status_label: c.status.label().to_string(),
        created_at: c.created_at,
        updated_at: c.updated_at,
    }
}

/// Propostas e contratos numa lista só, mais recentes primeiro.
pub fn merge_documents(
    proposals: Vec<Proposal>,
    contracts: Vec<Contract>,
    filter: &DocumentFilter,
) -> Vec<DocumentSummary> {
    let wants = |kind: DocumentKind| filter.kind.is_none_or(|k| k == kind);

    let mut docs: Vec<DocumentSummary> = Vec::new();
    if wants(DocumentKind::Proposal) {
        docs.extend(proposals.into_iter().map(proposal_summary));
    }
    if wants(DocumentKind::Contract) {
        docs.extend(contracts.into_iter().map(contract_summary));
    }
    if let Some(status) = filter.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        docs.retain(|d| d.status == status);
    }
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    docs
}

#[derive(Clone)]
pub struct DocumentService {
    proposals: Repository<Proposal>,
    contracts: Repository<Contract>,
    profile: ProfileService,
    settings: SettingsService,
    exporter: Arc<dyn PdfExporter>,
}

impl DocumentService {
    pub fn new(
        proposals: Repository<Proposal>,
        contracts: Repository<Contract>,
        profile: ProfileService,
        settings: SettingsService,
        exporter: Arc<dyn PdfExporter>,
    ) -> Self {
        Self { proposals, contracts, profile, settings, exporter }
    }

    pub async fn list(&self, owner_id: Uuid, filter: &DocumentFilter) -> Result<Vec<DocumentSummary>, AppError> {
        let proposals = self.proposals.list_for_owner(owner_id).await?;
        let contracts = self.contracts.list_for_owner(owner_id).await?;
        Ok(merge_documents(proposals, contracts, filter))
    }

    /// Pré-visualização HTML ou PDF do documento.
    pub async fn render(
        &self,
        owner_id: Uuid,
        doc: DocumentRef<'_>,
        format: OutputFormat,
    ) -> Result<RenderedDocument, AppError> {
        let freelancer = self.profile.find(owner_id).await?;
        let settings = self.settings.get_or_create(owner_id).await?;
        let ctx = PreviewContext { freelancer: freelancer.as_ref(), settings: &settings };

        match format {
            OutputFormat::Html => Ok(RenderedDocument::Html(render_preview_html(doc, &ctx))),
            OutputFormat::Pdf => {
                let layout = printable(doc, &ctx);
                // genpdf é síncrono: roda fora do executor
                let exporter = self.exporter.clone();
                let bytes = tokio::task::spawn_blocking(move || exporter.export(&layout))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de exportação do PDF: {}", e))??;
                Ok(RenderedDocument::Pdf(bytes))
            }
        }
    }
}
