// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Recebimento (ou valor a receber) lançado manualmente contra um contrato.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub contract_id: Option<Uuid>,

    #[schema(example = "Entrada - site institucional")]
    pub description: String,

    #[schema(example = "1500.00")]
    pub amount: Decimal,

    #[schema(example = "2026-11-10")]
    pub due_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,

    #[schema(example = true)]
    pub received: bool,

    #[schema(example = "Pix")]
    pub payment_method: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecordPayload {
    pub contract_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Informe a descrição."))]
    pub description: String,

    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,

    pub due_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub received: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecordFilter {
    pub contract_id: Option<Uuid>,
}
