// src/services/settings_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Repository,
    models::settings::{UpdateSettingsRequest, UserSettings},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: Repository<UserSettings>,
}

impl SettingsService {
    pub fn new(repo: Repository<UserSettings>) -> Self {
        Self { repo }
    }

    /// Uma configuração por dono (id = id do dono). Criada com os padrões no
    /// primeiro acesso.
    pub async fn get_or_create(&self, owner_id: Uuid) -> Result<UserSettings, AppError> {
        if let Some(settings) = self.repo.find(owner_id, owner_id).await? {
            return Ok(settings);
        }
        tracing::debug!(%owner_id, "Criando configurações padrão");
        self.repo.create(&UserSettings::defaults_for(owner_id, Utc::now())).await
    }

    pub async fn update(&self, owner_id: Uuid, input: UpdateSettingsRequest) -> Result<UserSettings, AppError> {
        let mut settings = self.get_or_create(owner_id).await?;

        if let Some(v) = input.proposal_validity_value {
            settings.proposal_validity_value = v;
        }
        if let Some(v) = input.proposal_validity_unit {
            settings.proposal_validity_unit = v;
        }
        if let Some(v) = input.date_format {
            settings.date_format = v;
        }
        if let Some(v) = input.autosave {
            settings.autosave = v;
        }
        if let Some(v) = input.notify_email {
            settings.notify_email = v;
        }
        if let Some(v) = input.notify_follow_ups {
            settings.notify_follow_ups = v;
        }
        if let Some(v) = input.notify_payments {
            settings.notify_payments = v;
        }
        if let Some(v) = input.notify_contracts {
            settings.notify_contracts = v;
        }
        settings.updated_at = Utc::now();

        self.repo.update(&settings).await?.ok_or(AppError::NotFound("Configuração"))
    }
}
