// src/models/document.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Proposal,
    Contract,
}

/// Linha da lista de documentos (propostas e contratos juntos).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub client_name: String,
    pub title: String,
    pub value: Decimal,
    /// Status serializado (`draft`, `sent`, `active`, ...)
    pub status: String,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DocumentFilter {
    pub kind: Option<DocumentKind>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GenerateQuery {
    #[serde(default)]
    pub format: OutputFormat,
}
