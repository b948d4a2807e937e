// src/models/freelancer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::client::tax_document;

pub const MAX_PORTFOLIO_IMAGES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Free,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Trial,
    Active,
    Expired,
    Blocked,
}

/// Cadastro do freelancer: dados do contratado, plano/assinatura e perfil público.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Freelancer {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "João Pereira")]
    pub name: String,
    pub email: String,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    // Assinatura
    pub plan_type: PlanType,
    pub subscription_status: SubscriptionStatus,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub marketing_opt_in: bool,

    // Perfil público
    #[schema(example = "joao-designer")]
    pub slug: Option<String>,
    #[schema(example = "Designer gráfico")]
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub whatsapp_link: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub portfolio_urls: Vec<String>,
    #[serde(default)]
    pub published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projeção pública do perfil (só existe quando publicado).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub slug: String,
    pub display_name: String,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub whatsapp_link: Option<String>,
    pub video_url: Option<String>,
    pub portfolio_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Informe seu nome."))]
    pub name: Option<String>,
    #[validate(custom(function = "tax_document"))]
    pub document: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 2, message = "Use a sigla do estado (UF)."))]
    pub state: Option<String>,

    #[validate(length(min = 3, max = 60, message = "O endereço deve ter entre 3 e 60 caracteres."))]
    #[schema(example = "joao-designer")]
    pub slug: Option<String>,
    pub specialty: Option<String>,
    #[validate(length(max = 1000, message = "A bio deve ter no máximo 1000 caracteres."))]
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub video_url: Option<String>,
    #[validate(length(max = 6, message = "Máximo de 6 imagens no portfólio."))]
    pub portfolio_urls: Option<Vec<String>>,
    pub published: Option<bool>,
}
