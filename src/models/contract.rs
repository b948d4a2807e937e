// src/models/contract.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{client::tax_document, proposal::positive_amount, status::ContractStatus};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    #[default]
    Individual, // Pessoa física
    Company,    // Pessoa jurídica
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineMode {
    #[default]
    Days,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayCountKind {
    #[default]
    Business, // dias úteis
    Calendar, // dias corridos
}

/// Os seis esquemas de parcelamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum PaymentType {
    #[default]
    #[serde(rename = "a-vista")]
    AVista,
    #[serde(rename = "50-50")]
    FiftyFifty,
    #[serde(rename = "30-70")]
    ThirtySeventy,
    #[serde(rename = "3x")]
    ThreeInstallments,
    #[serde(rename = "4x")]
    FourInstallments,
    #[serde(rename = "parcelado-acordo")]
    ByAgreement,
}

impl PaymentType {
    #[cfg(test)]
    pub const ALL: [PaymentType; 6] = [
        PaymentType::AVista,
        PaymentType::FiftyFifty,
        PaymentType::ThirtySeventy,
        PaymentType::ThreeInstallments,
        PaymentType::FourInstallments,
        PaymentType::ByAgreement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::AVista => "À vista",
            PaymentType::FiftyFifty => "50% na assinatura e 50% na entrega",
            PaymentType::ThirtySeventy => "30% na assinatura e 70% na entrega",
            PaymentType::ThreeInstallments => "3 parcelas iguais",
            PaymentType::FourInstallments => "4 parcelas iguais",
            PaymentType::ByAgreement => "Parcelado conforme acordo",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    #[schema(example = 1)]
    pub number: u32,
    #[schema(example = "33.33")]
    pub percentage: Decimal,
    #[schema(example = "333.30")]
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    // Vínculos
    pub proposal_id: Option<Uuid>,
    pub client_id: Option<Uuid>,

    // Contratante
    pub person_type: PersonType,
    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    #[schema(example = "529.982.247-25")]
    pub client_document: Option<String>,
    pub client_rg: Option<String>,
    #[schema(example = "Silva Design Ltda")]
    pub client_company_name: Option<String>,
    pub client_address: Option<String>,
    pub client_city: Option<String>,
    pub client_state: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,

    // Serviço
    #[schema(example = "Desenvolvimento de site institucional")]
    pub service_name: String,
    pub service_scope: Option<String>,
    pub deliverables: Option<String>,

    #[schema(example = "4500.00")]
    pub value: Decimal,

    // Prazo: só um dos dois é significativo, conforme `deadline_mode`
    pub deadline_mode: DeadlineMode,
    pub deadline_days: Option<u32>,
    pub deadline_day_kind: DayCountKind,
    pub deadline_date: Option<NaiveDate>,

    // Pagamento
    pub payment_type: PaymentType,
    pub installments: Vec<Installment>,
    pub payment_notes: Option<String>,

    pub status: ContractStatus,

    /// Texto final renderizado no último salvamento.
    pub contract_text: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractPayload {
    /// Pré-preenche a partir de uma proposta (cliente, serviço, escopo, valor).
    pub from_proposal_id: Option<Uuid>,

    #[serde(default)]
    pub person_type: PersonType,

    #[serde(default)]
    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    /// CPF (pessoa física) ou CNPJ (pessoa jurídica).
    #[validate(custom(function = "tax_document"))]
    pub client_document: Option<String>,
    pub client_rg: Option<String>,
    pub client_company_name: Option<String>,
    pub client_address: Option<String>,
    pub client_city: Option<String>,
    #[validate(length(max = 2, message = "Use a sigla do estado (UF)."))]
    pub client_state: Option<String>,
    pub client_phone: Option<String>,
    #[validate(email(message = "E-mail inválido."))]
    pub client_email: Option<String>,

    #[serde(default)]
    pub service_name: String,
    pub service_scope: Option<String>,
    pub deliverables: Option<String>,

    /// Opcional quando `fromProposalId` é informado.
    #[validate(custom(function = "positive_amount"))]
    pub value: Option<Decimal>,

    #[serde(default)]
    pub deadline_mode: DeadlineMode,
    #[validate(range(min = 1, message = "O prazo deve ter pelo menos 1 dia."))]
    pub deadline_days: Option<u32>,
    #[serde(default)]
    pub deadline_day_kind: DayCountKind,
    pub deadline_date: Option<NaiveDate>,

    #[serde(default)]
    pub payment_type: PaymentType,
    /// Vencimento por posição de parcela (1ª, 2ª, ...).
    #[serde(default)]
    pub installment_due_dates: Vec<Option<NaiveDate>>,
    pub payment_notes: Option<String>,

    pub status: Option<ContractStatus>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContractStatusPayload {
    pub status: ContractStatus,
}

/// Extrato financeiro de um contrato.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractLedger {
    pub contract_id: Uuid,
    pub contract_value: Decimal,
    pub amount_received: Decimal,
    pub amount_outstanding: Decimal,
    pub records: Vec<crate::models::finance::FinancialRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn payload_defaults_and_value_rule() {
        let payload: ContractPayload = serde_json::from_value(serde_json::json!({
            "clientName": "Maria",
            "serviceName": "Site",
            "value": -10
        }))
        .unwrap();
        assert_eq!(payload.person_type, PersonType::Individual);
        assert_eq!(payload.payment_type, PaymentType::default());
        assert!(payload.validate().is_err());

        let bad_cpf: ContractPayload = serde_json::from_value(serde_json::json!({
            "clientName": "Maria",
            "serviceName": "Site",
            "value": 100,
            "clientDocument": "111.111.111-11"
        }))
        .unwrap();
        assert!(bad_cpf.validate().unwrap_err().field_errors().contains_key("client_document"));

        let no_value: ContractPayload =
            serde_json::from_value(serde_json::json!({ "fromProposalId": Uuid::nil() })).unwrap();
        assert!(no_value.validate().is_ok());
    }
}
