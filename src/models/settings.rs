// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::format::DateFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidityUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

impl ValidityUnit {
    pub fn label(&self, value: u32) -> &'static str {
        match (self, value == 1) {
            (ValidityUnit::Days, true) => "dia",
            (ValidityUnit::Days, false) => "dias",
            (ValidityUnit::Weeks, true) => "semana",
            (ValidityUnit::Weeks, false) => "semanas",
            (ValidityUnit::Months, true) => "mês",
            (ValidityUnit::Months, false) => "meses",
        }
    }
}

/// Preferências do usuário (uma por dono). Criadas na primeira leitura.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[schema(ignore)]
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = 30)]
    pub proposal_validity_value: u32,
    pub proposal_validity_unit: ValidityUnit,

    pub date_format: DateFormat,

    #[schema(example = true)]
    pub autosave: bool,

    // Notificações
    pub notify_email: bool,
    pub notify_follow_ups: bool,
    pub notify_payments: bool,
    pub notify_contracts: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    pub fn defaults_for(owner_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: owner_id,
            owner_id,
            proposal_validity_value: 30,
            proposal_validity_unit: ValidityUnit::Days,
            date_format: DateFormat::DayMonthYear,
            autosave: true,
            notify_email: true,
            notify_follow_ups: true,
            notify_payments: true,
            notify_contracts: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// "30 dias", "2 semanas", "1 mês"
    pub fn validity_text(&self) -> String {
        format!(
            "{} {}",
            self.proposal_validity_value,
            self.proposal_validity_unit.label(self.proposal_validity_value)
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, max = 365, message = "Validade deve estar entre 1 e 365."))]
    #[schema(example = 15)]
    pub proposal_validity_value: Option<u32>,
    pub proposal_validity_unit: Option<ValidityUnit>,
    pub date_format: Option<DateFormat>,
    pub autosave: Option<bool>,
    pub notify_email: Option<bool>,
    pub notify_follow_ups: Option<bool>,
    pub notify_payments: Option<bool>,
    pub notify_contracts: Option<bool>,
}
