// src/models/proposal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::status::ProposalStatus;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub client_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    #[schema(example = "maria@email.com")]
    pub client_email: Option<String>,
    #[schema(example = "(11) 98765-4321")]
    pub client_phone: Option<String>,

    #[schema(example = "Identidade visual")]
    pub service: String,
    pub scope: Option<String>,

    #[schema(example = "2500.00")]
    pub value: Decimal,

    #[schema(example = "20 dias úteis")]
    pub deadline: Option<String>,
    #[schema(example = "Pix")]
    pub payment_method: Option<String>,

    pub status: ProposalStatus,

    pub follow_up_date: Option<NaiveDate>,
    #[schema(example = "WhatsApp")]
    pub follow_up_channel: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Valor monetário de proposta/contrato precisa ser maior que zero.
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

/// Corpo de criação/edição. `status` é opcional: na criação o padrão é rascunho.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPayload {
    #[validate(length(min = 1, message = "Informe o nome do cliente."))]
    #[schema(example = "Maria da Silva")]
    pub client_name: String,

    #[validate(email(message = "E-mail inválido."))]
    pub client_email: Option<String>,
    pub client_phone: Option<String>,

    #[validate(length(min = 1, message = "Informe o serviço."))]
    #[schema(example = "Identidade visual")]
    pub service: String,
    pub scope: Option<String>,

    #[validate(custom(function = "positive_amount"))]
    #[schema(example = "2500.00")]
    pub value: Decimal,

    pub deadline: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<ProposalStatus>,
    pub follow_up_date: Option<NaiveDate>,
    pub follow_up_channel: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProposalStatusPayload {
    pub status: ProposalStatus,
}
