// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::format::is_valid_tax_document;

// Criado automaticamente (busca-ou-cria pelo nome) quando uma proposta ou um
// contrato é salvo. Nunca é apagado automaticamente.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    #[schema(example = "(11) 98765-4321")]
    pub phone: Option<String>,
    #[schema(example = "529.982.247-25")]
    pub document: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// CPF ou CNPJ, escolhido pela quantidade de dígitos. Vazio é aceito.
pub(crate) fn tax_document(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || is_valid_tax_document(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("tax_document");
    err.message = Some("CPF ou CNPJ inválido.".into());
    Err(err)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "Informe o nome do cliente."))]
    pub name: String,
    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(custom(function = "tax_document"))]
    pub document: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_tax_document_with_wrong_check_digits() {
        let payload = |document: &str| ClientPayload {
            name: "Maria".into(),
            document: Some(document.into()),
            ..Default::default()
        };

        let errors = payload("529.982.247-24").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("document"));
        assert!(payload("123").validate().is_err());

        assert!(payload("529.982.247-25").validate().is_ok());
        assert!(payload("11.222.333/0001-81").validate().is_ok());
        assert!(payload("  ").validate().is_ok());
    }
}
